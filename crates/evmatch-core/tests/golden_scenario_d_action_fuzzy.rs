use evmatch_core::{ConfidenceClass, MatchSettings, MatchTier, Thresholds, analyze_templates};

#[test]
fn golden_scenario_d_action_fuzzy() {
    let report = analyze_templates(
        &["Sfx_Drake_Alert.wav"],
        "$prefix_$feature_$action",
        None,
        &["PrefixCharacterNameAlert"],
        MatchSettings::default(),
    )
    .unwrap();

    let group = report.group_for("PrefixCharacterNameAlert").unwrap();
    assert_eq!(group.tier, MatchTier::ActionFuzzy);
    assert_eq!(group.confidence, 0.95);
    assert_eq!(group.class, ConfidenceClass::Perfect);
    assert_eq!(group.files, vec!["Sfx_Drake_Alert.wav"]);
}

#[test]
fn golden_scenario_d_thresholds_only_change_the_class() {
    let settings = MatchSettings {
        thresholds: Thresholds::new(0.5, 0.99).unwrap(),
        ..MatchSettings::default()
    };
    let report = analyze_templates(
        &["Sfx_Drake_Alert.wav"],
        "$prefix_$feature_$action",
        None,
        &["PrefixCharacterNameAlert"],
        settings,
    )
    .unwrap();

    let group = report.group_for("PrefixCharacterNameAlert").unwrap();
    assert_eq!(group.confidence, 0.95);
    assert_eq!(group.class, ConfidenceClass::Good);
}
