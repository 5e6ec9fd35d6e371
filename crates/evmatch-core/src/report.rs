use std::fmt;

use serde::Serialize;

use crate::Severity;
use crate::components::ParseMiss;
use crate::error::BuildError;
use crate::settings::ConfidenceClass;

/// Matching strategy that produced an assignment, strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Exact,
    Normalized,
    ActionFuzzy,
}

impl MatchTier {
    pub const ALL: [MatchTier; 3] = [
        MatchTier::Exact,
        MatchTier::Normalized,
        MatchTier::ActionFuzzy,
    ];

    pub fn confidence(self) -> f64 {
        match self {
            MatchTier::Exact => 1.0,
            MatchTier::Normalized => 0.98,
            MatchTier::ActionFuzzy => 0.95,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Normalized => "normalized",
            MatchTier::ActionFuzzy => "action-fuzzy",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Files assigned to one expected name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchGroup {
    pub target: String,
    /// In input order.
    pub files: Vec<String>,
    pub confidence: f64,
    pub tier: MatchTier,
    pub class: ConfidenceClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OrphanReason {
    /// No parse strategy could decompose the file name.
    Unparseable(ParseMiss),
    /// Parsed, but the destination pattern could not be built.
    BuildFailed(BuildError),
    /// Built a candidate name that no tier matched.
    NoMatch,
    /// Tier 3 found several targets and the ambiguity policy declined to pick.
    AmbiguousAction { action: String, targets: Vec<String> },
}

impl fmt::Display for OrphanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrphanReason::Unparseable(miss) => write!(f, "unparseable: {miss}"),
            OrphanReason::BuildFailed(err) => write!(f, "build failed: {err}"),
            OrphanReason::NoMatch => f.write_str("no expected name matched"),
            OrphanReason::AmbiguousAction { action, targets } => write!(
                f,
                "action {action:?} matches {} targets: {}",
                targets.len(),
                targets.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrphanFile {
    pub path: String,
    /// Destination name built from the file, when parsing and building worked.
    pub candidate: Option<String>,
    pub reason: OrphanReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: &'static str, // e.g. "duplicate_file", "ambiguous_action"
    pub severity: Severity,
    pub subject: String, // file path or target name the diagnostic is about
    pub message: String,
}

/// Counts derived from a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub groups: usize,
    pub matched_files: usize,
    pub exact: usize,
    pub normalized: usize,
    pub action_fuzzy: usize,
    pub orphan_files: usize,
    pub orphan_targets: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    groups: Vec<MatchGroup>,
    orphan_files: Vec<OrphanFile>,
    orphan_targets: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl AnalysisReport {
    pub(crate) fn new(
        groups: Vec<MatchGroup>,
        orphan_files: Vec<OrphanFile>,
        orphan_targets: Vec<String>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            groups,
            orphan_files,
            orphan_targets,
            diagnostics,
        }
    }

    /// By descending confidence, then target name.
    pub fn groups(&self) -> &[MatchGroup] {
        &self.groups
    }

    /// In input order.
    pub fn orphan_files(&self) -> &[OrphanFile] {
        &self.orphan_files
    }

    /// In lexical order.
    pub fn orphan_targets(&self) -> &[String] {
        &self.orphan_targets
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn group_for(&self, target: &str) -> Option<&MatchGroup> {
        self.groups.iter().find(|g| g.target == target)
    }

    /// Groups a file was assigned to. More than one only under
    /// `AmbiguityPolicy::AssignAll`.
    pub fn groups_of(&self, path: &str) -> Vec<&MatchGroup> {
        let key = path_key(path);
        self.groups
            .iter()
            .filter(|g| g.files.iter().any(|f| path_key(f) == key))
            .collect()
    }

    pub fn is_orphan_file(&self, path: &str) -> bool {
        let key = path_key(path);
        self.orphan_files.iter().any(|o| path_key(&o.path) == key)
    }

    pub fn is_orphan_target(&self, target: &str) -> bool {
        self.orphan_targets.iter().any(|t| t == target)
    }

    pub fn has_orphans(&self) -> bool {
        !self.orphan_files.is_empty() || !self.orphan_targets.is_empty()
    }

    pub fn summary(&self) -> Summary {
        let mut s = Summary {
            groups: self.groups.len(),
            orphan_files: self.orphan_files.len(),
            orphan_targets: self.orphan_targets.len(),
            ..Summary::default()
        };
        for g in &self.groups {
            s.matched_files += g.files.len();
            match g.tier {
                MatchTier::Exact => s.exact += 1,
                MatchTier::Normalized => s.normalized += 1,
                MatchTier::ActionFuzzy => s.action_fuzzy += 1,
            }
        }
        s
    }
}

/// Comparison key for file paths: `\` becomes `/` and leading `./` is
/// dropped, so `./sfx/a.wav` and `sfx\a.wav` are the same file.
pub(crate) fn path_key(s: &str) -> String {
    let t = s.trim().replace('\\', "/");
    let mut rest = t.as_str();
    while let Some(r) = rest.strip_prefix("./") {
        rest = r;
    }
    rest.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_confidence_is_strictly_ordered() {
        let c: Vec<f64> = MatchTier::ALL.iter().map(|t| t.confidence()).collect();
        assert!(c[0] > c[1] && c[1] > c[2]);
    }

    #[test]
    fn path_key_unifies_spellings() {
        assert_eq!(path_key("./sfx/a.wav"), "sfx/a.wav");
        assert_eq!(path_key("sfx\\a.wav"), "sfx/a.wav");
        assert_eq!(path_key(" ././a.wav "), "a.wav");
    }

    #[test]
    fn orphan_reason_serializes_with_kind_tag() {
        let reason = OrphanReason::AmbiguousAction {
            action: "Alert".into(),
            targets: vec!["A".into(), "B".into()],
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["kind"], "ambiguous-action");
        assert_eq!(json["targets"][1], "B");

        let json = serde_json::to_value(OrphanReason::NoMatch).unwrap();
        assert_eq!(json["kind"], "no-match");
    }

    #[test]
    fn lookups_on_report() {
        let report = AnalysisReport::new(
            vec![MatchGroup {
                target: "SfxDragonAttack".into(),
                files: vec!["sfx/Sfx_Dragon_Attack.wav".into()],
                confidence: 1.0,
                tier: MatchTier::Exact,
                class: ConfidenceClass::Perfect,
            }],
            vec![OrphanFile {
                path: "sfx/Clip.wav".into(),
                candidate: None,
                reason: OrphanReason::NoMatch,
            }],
            vec!["EventB".into()],
            Vec::new(),
        );
        assert!(report.group_for("SfxDragonAttack").is_some());
        assert_eq!(report.groups_of("./sfx/Sfx_Dragon_Attack.wav").len(), 1);
        assert!(report.is_orphan_file("sfx\\Clip.wav"));
        assert!(report.is_orphan_target("EventB"));
        assert!(report.has_orphans());

        let s = report.summary();
        assert_eq!((s.groups, s.exact, s.matched_files), (1, 1, 1));
        assert_eq!((s.orphan_files, s.orphan_targets), (1, 1));
    }
}
