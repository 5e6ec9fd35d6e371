//! Tiered assignment of candidate files to expected names.
//!
//! Every file is parsed with the source pattern and rebuilt with the
//! destination pattern; the rebuilt name is then compared against the
//! expected names in three passes of decreasing strictness. A target that
//! received files in one pass is closed to later passes but keeps collecting
//! files within the pass that opened it.

use std::collections::{HashMap, HashSet};

use evmatch_template::Tag;

use crate::error::Error;
use crate::normalize::normalize_name;
use crate::pattern::Pattern;
use crate::report::{
    AnalysisReport, Diagnostic, MatchGroup, MatchTier, OrphanFile, OrphanReason, path_key,
};
use crate::settings::{AmbiguityPolicy, MatchSettings};
use crate::Severity;

/// Stateless driver; one `analyze` call is independent of every other.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    settings: MatchSettings,
}

/// Lookup tables over the expected names, built once per call.
struct TargetIndex<'t> {
    /// Deduplicated, lexically sorted; indices below refer to this list.
    names: Vec<&'t str>,
    exact: HashMap<&'t str, usize>,
    normalized: HashMap<String, Vec<usize>>,
    by_action: HashMap<String, Vec<usize>>,
}

/// A file that parsed and built successfully.
struct Candidate {
    file: usize,
    built: String,
    normalized: String,
    action: Option<String>,
}

/// Per-call assignment state.
struct Assignment {
    /// Tier at which each target first received a file.
    opened: Vec<Option<MatchTier>>,
    /// Files per target, as indices into the file list.
    files: Vec<Vec<usize>>,
}

impl Assignment {
    fn new(targets: usize) -> Self {
        Self {
            opened: vec![None; targets],
            files: vec![Vec::new(); targets],
        }
    }

    fn accepts(&self, target: usize, tier: MatchTier) -> bool {
        self.opened[target].map_or(true, |t| t == tier)
    }

    fn assign(&mut self, target: usize, file: usize, tier: MatchTier) {
        self.opened[target].get_or_insert(tier);
        self.files[target].push(file);
    }
}

impl Matcher {
    pub fn new(settings: MatchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Match `files` against `expected`. `destination` defaults to `source`.
    ///
    /// Never fails: unparseable files, build failures and unmatched names are
    /// all reported in the returned `AnalysisReport`.
    pub fn analyze<F, T>(
        &self,
        files: &[F],
        source: &Pattern,
        destination: Option<&Pattern>,
        expected: &[T],
    ) -> AnalysisReport
    where
        F: AsRef<str>,
        T: AsRef<str>,
    {
        let destination = destination.unwrap_or(source);
        let mut diagnostics = Vec::new();

        let files = dedup_files(files, &mut diagnostics);
        let index = self.index_targets(expected, &mut diagnostics);
        tracing::debug!(
            files = files.len(),
            targets = index.names.len(),
            source = source.template(),
            destination = destination.template(),
            "starting analysis"
        );

        let mut orphans: Vec<(usize, OrphanFile)> = Vec::new();
        let mut candidates: Vec<Candidate> = Vec::new();

        for (i, path) in files.iter().enumerate() {
            match self.candidate(i, path, source, destination) {
                Ok(c) => candidates.push(c),
                Err(reason) => {
                    tracing::debug!(file = path, %reason, "file is an orphan");
                    orphans.push((
                        i,
                        OrphanFile {
                            path: path.to_string(),
                            candidate: None,
                            reason,
                        },
                    ));
                }
            }
        }

        let mut assignment = Assignment::new(index.names.len());
        let mut pending: Vec<&Candidate> = candidates.iter().collect();

        for tier in MatchTier::ALL {
            let mut unmatched = Vec::new();
            for cand in pending {
                match self.pick(tier, cand, &index, &assignment, &mut diagnostics, &files) {
                    Pick::Targets(targets) => {
                        for t in targets {
                            tracing::debug!(
                                %tier,
                                file = files[cand.file],
                                target = index.names[t],
                                "assigned"
                            );
                            assignment.assign(t, cand.file, tier);
                        }
                    }
                    Pick::None => unmatched.push(cand),
                    Pick::Declined { action, targets } => orphans.push((
                        cand.file,
                        OrphanFile {
                            path: files[cand.file].to_string(),
                            candidate: Some(cand.built.clone()),
                            reason: OrphanReason::AmbiguousAction { action, targets },
                        },
                    )),
                }
            }
            pending = unmatched;
        }

        for cand in pending {
            orphans.push((
                cand.file,
                OrphanFile {
                    path: files[cand.file].to_string(),
                    candidate: Some(cand.built.clone()),
                    reason: OrphanReason::NoMatch,
                },
            ));
        }
        orphans.sort_by_key(|(i, _)| *i);

        let mut groups = Vec::new();
        let mut orphan_targets = Vec::new();
        for (t, name) in index.names.iter().enumerate() {
            let Some(tier) = assignment.opened[t] else {
                orphan_targets.push(name.to_string());
                continue;
            };
            let mut file_ids = assignment.files[t].clone();
            file_ids.sort_unstable();
            let confidence = tier.confidence();
            groups.push(MatchGroup {
                target: name.to_string(),
                files: file_ids.iter().map(|&i| files[i].to_string()).collect(),
                confidence,
                tier,
                class: self.settings.thresholds.classify(confidence),
            });
        }
        groups.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.target.cmp(&b.target)));

        let report = AnalysisReport::new(
            groups,
            orphans.into_iter().map(|(_, o)| o).collect(),
            orphan_targets,
            diagnostics,
        );
        let s = report.summary();
        tracing::debug!(
            groups = s.groups,
            orphan_files = s.orphan_files,
            orphan_targets = s.orphan_targets,
            "analysis finished"
        );
        report
    }

    fn candidate(
        &self,
        file: usize,
        path: &str,
        source: &Pattern,
        destination: &Pattern,
    ) -> Result<Candidate, OrphanReason> {
        let parsed = source
            .parse_with(path, &self.settings.keywords)
            .map_err(OrphanReason::Unparseable)?;
        let built = destination
            .build(&parsed.components)
            .map_err(OrphanReason::BuildFailed)?;
        let action = parsed
            .components
            .get(Tag::Action)
            .map(|a| self.action_key(a).unwrap_or_else(|| normalize_name(a)));

        Ok(Candidate {
            file,
            normalized: normalize_name(&built),
            built,
            action,
        })
    }

    /// Normalized form of the best keyword in `text`.
    fn action_key(&self, text: &str) -> Option<String> {
        self.settings.keywords.find_longest(text).map(normalize_name)
    }

    fn index_targets<'t, T: AsRef<str>>(
        &self,
        expected: &'t [T],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TargetIndex<'t> {
        let mut seen = HashSet::new();
        let mut names: Vec<&'t str> = Vec::with_capacity(expected.len());
        for name in expected.iter().map(AsRef::as_ref) {
            if seen.insert(name) {
                names.push(name);
            } else {
                tracing::warn!(target_name = name, "duplicate expected name ignored");
                diagnostics.push(Diagnostic {
                    code: "duplicate_target",
                    severity: Severity::Warning,
                    subject: name.to_string(),
                    message: "expected name listed more than once; later entries ignored".into(),
                });
            }
        }
        names.sort_unstable();

        let mut index = TargetIndex {
            exact: HashMap::with_capacity(names.len()),
            normalized: HashMap::new(),
            by_action: HashMap::new(),
            names: Vec::new(),
        };
        for (i, &name) in names.iter().enumerate() {
            index.exact.insert(name, i);
            index.normalized.entry(normalize_name(name)).or_default().push(i);
            if let Some(key) = self.action_key(name) {
                index.by_action.entry(key).or_default().push(i);
            }
        }
        index.names = names;
        index
    }

    fn pick(
        &self,
        tier: MatchTier,
        cand: &Candidate,
        index: &TargetIndex<'_>,
        assignment: &Assignment,
        diagnostics: &mut Vec<Diagnostic>,
        files: &[&str],
    ) -> Pick {
        let open = |ts: &[usize]| -> Vec<usize> {
            ts.iter().copied().filter(|&t| assignment.accepts(t, tier)).collect()
        };

        match tier {
            MatchTier::Exact => index
                .exact
                .get(cand.built.as_str())
                .filter(|&&t| assignment.accepts(t, tier))
                .map_or(Pick::None, |&t| Pick::Targets(vec![t])),
            MatchTier::Normalized => index
                .normalized
                .get(&cand.normalized)
                .and_then(|ts| open(ts).first().copied())
                .map_or(Pick::None, |t| Pick::Targets(vec![t])),
            MatchTier::ActionFuzzy => {
                let Some(action) = &cand.action else {
                    return Pick::None;
                };
                let tied = index.by_action.get(action).map(|ts| open(ts)).unwrap_or_default();
                if tied.len() <= 1 {
                    return tied.first().map_or(Pick::None, |&t| Pick::Targets(vec![t]));
                }

                let names: Vec<String> = tied.iter().map(|&t| index.names[t].to_string()).collect();
                let file = files[cand.file];
                match self.settings.ambiguity {
                    AmbiguityPolicy::FirstLexical => {
                        diagnostics.push(Diagnostic {
                            code: "ambiguous_action",
                            severity: Severity::Info,
                            subject: file.to_string(),
                            message: format!(
                                "action {action:?} matches {}; assigned to {}",
                                names.join(", "),
                                names[0]
                            ),
                        });
                        Pick::Targets(vec![tied[0]])
                    }
                    AmbiguityPolicy::AssignAll => {
                        diagnostics.push(Diagnostic {
                            code: "ambiguous_action",
                            severity: Severity::Info,
                            subject: file.to_string(),
                            message: format!("action {action:?} assigned to {}", names.join(", ")),
                        });
                        Pick::Targets(tied)
                    }
                    AmbiguityPolicy::Orphan => Pick::Declined {
                        action: action.clone(),
                        targets: names,
                    },
                }
            }
        }
    }
}

enum Pick {
    Targets(Vec<usize>),
    None,
    Declined { action: String, targets: Vec<String> },
}

/// Keep the first occurrence of each path.
fn dedup_files<'f, F: AsRef<str>>(
    files: &'f [F],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<&'f str> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(files.len());
    for path in files.iter().map(AsRef::as_ref) {
        if seen.insert(path_key(path)) {
            out.push(path);
        } else {
            tracing::warn!(file = path, "duplicate file ignored");
            diagnostics.push(Diagnostic {
                code: "duplicate_file",
                severity: Severity::Warning,
                subject: path.to_string(),
                message: "file listed more than once; later entries ignored".into(),
            });
        }
    }
    out
}

/// Compile both templates (separators inferred) and run the analysis.
///
/// Template errors abort before any file is looked at.
pub fn analyze_templates<F, T>(
    files: &[F],
    source: &str,
    destination: Option<&str>,
    expected: &[T],
    settings: MatchSettings,
) -> Result<AnalysisReport, Error>
where
    F: AsRef<str>,
    T: AsRef<str>,
{
    let source = Pattern::new(source)?;
    let destination = destination.map(Pattern::new).transpose()?;
    Ok(Matcher::new(settings).analyze(files, &source, destination.as_ref(), expected))
}
