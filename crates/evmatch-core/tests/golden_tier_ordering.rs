use evmatch_core::{MatchSettings, MatchTier, analyze_templates};

#[test]
fn golden_tier_ordering() {
    // One target per tier, plus a decoy sharing the exact target's action.
    let report = analyze_templates(
        &[
            "Sfx_Golem_Roar.wav",
            "sfx_wolf_howl_growl.wav",
            "Sfx_Dragon_Attack.wav",
        ],
        "$prefix_$feature_$action",
        None,
        &["Boss_Attack", "Sfx_Dragon_Attack", "SFX-WOLF-HOWL-GROWL", "Troll_Roar"],
        MatchSettings::default(),
    )
    .unwrap();

    let tiers: Vec<MatchTier> = report.groups().iter().map(|g| g.tier).collect();
    assert_eq!(
        tiers,
        vec![MatchTier::Exact, MatchTier::Normalized, MatchTier::ActionFuzzy]
    );
    let confidences: Vec<f64> = report.groups().iter().map(|g| g.confidence).collect();
    assert!(confidences.windows(2).all(|w| w[0] > w[1]));

    // The exact match wins even though Boss_Attack shares its action.
    assert_eq!(
        report.groups_of("Sfx_Dragon_Attack.wav")[0].target,
        "Sfx_Dragon_Attack"
    );
    assert_eq!(report.orphan_targets(), ["Boss_Attack"]);
}

#[test]
fn golden_tier_ordering_groups_sorted_by_name_within_tier() {
    let report = analyze_templates(
        &["Zeta_Door_Open.wav", "Alpha_Door_Close.wav"],
        "$prefix_$feature_$action",
        None,
        &["Zeta_Door_Open", "Alpha_Door_Close"],
        MatchSettings::default(),
    )
    .unwrap();

    let targets: Vec<&str> = report.groups().iter().map(|g| g.target.as_str()).collect();
    assert_eq!(targets, vec!["Alpha_Door_Close", "Zeta_Door_Open"]);
}
