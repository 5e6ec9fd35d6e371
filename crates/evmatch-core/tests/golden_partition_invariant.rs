use std::collections::BTreeSet;

use evmatch_core::{MatchSettings, MatchTier, OrphanReason, analyze_templates};

#[test]
fn golden_partition_invariant() {
    let files = [
        "audio/Sfx_Dragon_Attack_01.wav",
        "audio/Sfx_Dragon_Attack_02.wav",
        "audio/ui_menu_open.wav",
        "audio/Mechaflora_Strong_Repair_Alert.wav",
        "audio/Unrelated_Clip.wav",
        "audio/Sfx_Golem_Footstep.wav",
    ];
    let expected = [
        "SfxDragonAttack",
        "UIMenuOpen",
        "PrefixCharacterNameAlert",
        "EventWithoutAudio",
    ];

    let report = analyze_templates(
        &files,
        "$prefix_$feature_$action",
        Some("$prefix$feature$action"),
        &expected,
        MatchSettings::default(),
    )
    .unwrap();

    // Every file lands in exactly one place.
    let mut seen_files: Vec<&str> = Vec::new();
    for g in report.groups() {
        seen_files.extend(g.files.iter().map(String::as_str));
    }
    seen_files.extend(report.orphan_files().iter().map(|o| o.path.as_str()));
    assert_eq!(seen_files.len(), files.len());
    assert_eq!(
        seen_files.iter().copied().collect::<BTreeSet<_>>(),
        files.iter().copied().collect::<BTreeSet<_>>()
    );

    // Every expected name lands in exactly one place.
    let mut seen_targets: Vec<&str> = report.groups().iter().map(|g| g.target.as_str()).collect();
    seen_targets.extend(report.orphan_targets().iter().map(String::as_str));
    assert_eq!(seen_targets.len(), expected.len());
    assert_eq!(
        seen_targets.iter().copied().collect::<BTreeSet<_>>(),
        expected.iter().copied().collect::<BTreeSet<_>>()
    );

    assert_eq!(report.group_for("SfxDragonAttack").unwrap().files.len(), 2);
    assert_eq!(report.group_for("SfxDragonAttack").unwrap().tier, MatchTier::Exact);
    assert_eq!(report.group_for("UIMenuOpen").unwrap().tier, MatchTier::Normalized);
    assert_eq!(
        report.group_for("PrefixCharacterNameAlert").unwrap().tier,
        MatchTier::ActionFuzzy
    );
    assert_eq!(report.orphan_targets(), ["EventWithoutAudio"]);

    let reasons: Vec<_> = report.orphan_files().iter().map(|o| &o.reason).collect();
    assert!(matches!(reasons[0], OrphanReason::Unparseable(_)));
    assert_eq!(reasons[1], &OrphanReason::NoMatch);

    let summary = report.summary();
    assert_eq!(summary.matched_files + summary.orphan_files, files.len());
    assert_eq!(summary.groups + summary.orphan_targets, expected.len());
    assert_eq!((summary.exact, summary.normalized, summary.action_fuzzy), (1, 1, 1));
}
