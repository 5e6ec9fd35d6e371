use crate::args::OutputFormat;
use evmatch_core::{AnalysisReport, ConfidenceClass, OrphanReason, Severity, Summary};
use serde::Serialize;

// The JSON layout is a view over the report so the core types can change
// without breaking consumers of this output.
#[derive(Serialize)]
struct JsonOut<'a> {
    ok: bool,
    groups: Vec<JsonGroup<'a>>,
    orphan_files: Vec<JsonOrphan<'a>>,
    orphan_targets: &'a [String],
    diagnostics: Vec<JsonDiag<'a>>,
    summary: Summary,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    target: &'a str,
    files: &'a [String],
    confidence: f64,
    tier: &'static str,
    class: ConfidenceClass,
}

#[derive(Serialize)]
struct JsonOrphan<'a> {
    path: &'a str,
    candidate: Option<&'a str>,
    reason: &'a OrphanReason,
}

#[derive(Serialize)]
struct JsonDiag<'a> {
    code: &'a str,
    severity: Severity,
    subject: &'a str,
    message: &'a str,
}

pub fn render_json(report: &AnalysisReport) -> String {
    let out = JsonOut {
        ok: !report.has_orphans(),
        groups: report
            .groups()
            .iter()
            .map(|g| JsonGroup {
                target: &g.target,
                files: &g.files,
                confidence: g.confidence,
                tier: g.tier.as_str(),
                class: g.class,
            })
            .collect(),
        orphan_files: report
            .orphan_files()
            .iter()
            .map(|o| JsonOrphan {
                path: &o.path,
                candidate: o.candidate.as_deref(),
                reason: &o.reason,
            })
            .collect(),
        orphan_targets: report.orphan_targets(),
        diagnostics: report
            .diagnostics()
            .iter()
            .map(|d| JsonDiag {
                code: d.code,
                severity: d.severity,
                subject: &d.subject,
                message: &d.message,
            })
            .collect(),
        summary: report.summary(),
    };

    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{\"ok\":false}".to_string())
}

fn class_label(class: ConfidenceClass) -> &'static str {
    match class {
        ConfidenceClass::Perfect => "PERFECT",
        ConfidenceClass::Good => "GOOD",
        ConfidenceClass::Low => "LOW",
    }
}

fn severity_label(sev: Severity) -> &'static str {
    match sev {
        Severity::Info => "INFO",
        Severity::Warning => "WARNING",
    }
}

pub fn render_human(report: &AnalysisReport, verbosity: u8, quiet: bool) -> String {
    let mut out = String::new();

    if quiet {
        for o in report.orphan_files() {
            out.push_str(&o.path);
            out.push('\n');
        }
        for t in report.orphan_targets() {
            out.push_str(t);
            out.push('\n');
        }
        return out;
    }

    for g in report.groups() {
        out.push_str(&format!(
            "{} {} {:.2} {}\n",
            class_label(g.class),
            g.tier,
            g.confidence,
            g.target
        ));
        for f in &g.files {
            out.push_str(&format!("    {f}\n"));
        }
    }

    for o in report.orphan_files() {
        out.push_str(&format!("ORPHAN file: {}", o.path));
        if verbosity > 0 {
            out.push_str(&format!(" ({})", o.reason));
        }
        out.push('\n');
    }
    for t in report.orphan_targets() {
        out.push_str(&format!("ORPHAN target: {t}\n"));
    }

    for d in report.diagnostics() {
        if d.severity == Severity::Info && verbosity == 0 {
            continue;
        }
        out.push_str(&format!(
            "{} {}: {}: {}\n",
            severity_label(d.severity),
            d.code,
            d.subject,
            d.message
        ));
    }

    if !report.has_orphans() && !report.groups().is_empty() {
        out.push_str("OK: every file and expected name matched\n");
    }

    let s = report.summary();
    out.push_str(&format!(
        "summary: groups={} (exact={}, normalized={}, action-fuzzy={}) files={} orphan_files={} orphan_targets={}\n",
        s.groups, s.exact, s.normalized, s.action_fuzzy, s.matched_files, s.orphan_files, s.orphan_targets
    ));

    out
}

pub fn render(report: &AnalysisReport, format: OutputFormat, verbosity: u8, quiet: bool) -> String {
    match format {
        OutputFormat::Human => render_human(report, verbosity, quiet),
        OutputFormat::Json => render_json(report),
    }
}
