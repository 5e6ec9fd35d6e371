use evmatch_core::{MatchSettings, MatchTier, ParseStrategy, Pattern, Tag, analyze_templates};

#[test]
fn golden_scenario_a_exact_parse() {
    let pattern = Pattern::new("$prefix_$feature_$action").unwrap();
    let parsed = pattern.parse("Sfx_Dragon_Attack.wav").unwrap();

    assert_eq!(parsed.strategy, ParseStrategy::Strict);
    assert_eq!(parsed.components.get(Tag::Prefix), Some("Sfx"));
    assert_eq!(parsed.components.get(Tag::Feature), Some("Dragon"));
    assert_eq!(parsed.components.get(Tag::Action), Some("Attack"));
    assert_eq!(parsed.components.len(), 3);
    assert_eq!(parsed.iterator, None);
}

#[test]
fn golden_scenario_a_exact_match() {
    let report = analyze_templates(
        &["/audio/Sfx_Dragon_Attack.wav"],
        "$prefix_$feature_$action",
        None,
        &["Sfx_Dragon_Attack"],
        MatchSettings::default(),
    )
    .unwrap();

    let group = report.group_for("Sfx_Dragon_Attack").unwrap();
    assert_eq!(group.tier, MatchTier::Exact);
    assert_eq!(group.confidence, 1.0);
    assert_eq!(group.files, vec!["/audio/Sfx_Dragon_Attack.wav"]);
    assert!(!report.has_orphans());
}
