//! Optional TOML configuration, merged with command-line flags.
//!
//! ```toml
//! ambiguity = "first-lexical"
//!
//! [source]
//! template = "$prefix_$feature_$action"
//! separators = "_"
//!
//! [destination]
//! template = "$prefix$feature$action"
//!
//! [thresholds]
//! good = 0.7
//! perfect = 0.9
//!
//! [keywords]
//! extend = ["Whoosh"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use evmatch_core::{ActionKeywords, AmbiguityPolicy, MatchSettings, Pattern, Separators, Thresholds};
use serde::Deserialize;

use crate::args::Cli;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub source: PatternConfig,
    pub destination: PatternConfig,
    pub thresholds: ThresholdConfig,
    pub keywords: KeywordConfig,
    pub ambiguity: Option<AmbiguityPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternConfig {
    pub template: Option<String>,
    /// Same form as `--source-sep`: separator characters, or "none".
    pub separators: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    pub good: Option<f64>,
    pub perfect: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordConfig {
    /// Use exactly these keywords instead of the built-in table.
    pub replace: Option<Vec<String>>,
    /// Keywords appended to the table.
    pub extend: Vec<String>,
}

/// Everything an analysis run needs, resolved from flags and config.
#[derive(Debug)]
pub struct RunConfig {
    pub source: Pattern,
    pub destination: Option<Pattern>,
    pub settings: MatchSettings,
}

pub fn load(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse(&text).with_context(|| format!("parsing config {}", path.display()))
}

pub fn parse(text: &str) -> Result<FileConfig> {
    Ok(toml::from_str(text)?)
}

/// Merge command-line flags over file values and compile the templates.
pub fn resolve(cli: &Cli, file: FileConfig) -> Result<RunConfig> {
    let Some(source_template) = cli.source.clone().or(file.source.template) else {
        bail!("no source template: pass --source or set [source] template in the config file");
    };
    let source_sep = cli.source_sep.clone().or(file.source.separators);
    let source = compile(&source_template, source_sep.as_deref())?;

    let dest_sep = cli.dest_sep.clone().or(file.destination.separators);
    let destination = match cli.dest.clone().or(file.destination.template) {
        Some(t) => Some(compile(&t, dest_sep.as_deref())?),
        // A separator override alone re-expresses the source template.
        None => match dest_sep.as_deref() {
            Some(sep) => Some(source.with_separators(Separators::from_setting(sep))?),
            None => None,
        },
    };

    let defaults = Thresholds::default();
    let thresholds = Thresholds::new(
        cli.good.or(file.thresholds.good).unwrap_or(defaults.good()),
        cli.perfect
            .or(file.thresholds.perfect)
            .unwrap_or(defaults.perfect()),
    )?;

    let keywords = match file.keywords.replace {
        Some(list) => ActionKeywords::new(list),
        None => ActionKeywords::default(),
    }
    .extended(file.keywords.extend);
    if keywords.is_empty() {
        bail!("keyword table is empty; [keywords] replace needs at least one entry");
    }

    let ambiguity = cli
        .ambiguity
        .map(AmbiguityPolicy::from)
        .or(file.ambiguity)
        .unwrap_or_default();

    tracing::debug!(
        source = source.template(),
        destination = destination.as_ref().map(|d| d.template()),
        keywords = keywords.len(),
        ?ambiguity,
        "resolved configuration"
    );

    Ok(RunConfig {
        source,
        destination,
        settings: MatchSettings {
            thresholds,
            keywords,
            ambiguity,
        },
    })
}

fn compile(template: &str, separators: Option<&str>) -> Result<Pattern> {
    let pattern = match separators {
        Some(setting) => Pattern::compile(template, Separators::from_setting(setting))?,
        None => Pattern::new(template)?,
    };
    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn cli(extra: &[&str]) -> Cli {
        let mut argv = vec!["evmatch", "--files", "f.txt", "--expected", "e.txt"];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn loads_config_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"
ambiguity = "orphan"

[source]
template = "$prefix_$feature_$action"

[destination]
template = "$prefix$feature$action"

[thresholds]
good = 0.6

[keywords]
extend = ["Whoosh"]
"#
        )
        .unwrap();

        let file = load(tmp.path()).unwrap();
        let run = resolve(&cli(&[]), file).unwrap();

        assert_eq!(run.source.template(), "$prefix_$feature_$action");
        assert!(run.destination.as_ref().unwrap().is_camel_case());
        assert_eq!(run.settings.thresholds.good(), 0.6);
        assert_eq!(run.settings.thresholds.perfect(), 0.9);
        assert_eq!(run.settings.ambiguity, AmbiguityPolicy::Orphan);
        assert_eq!(run.settings.keywords.find_longest("Blade_Whoosh"), Some("Whoosh"));
    }

    #[test]
    fn flags_override_file_values() {
        let file = parse(
            r#"
ambiguity = "orphan"
[source]
template = "$feature_$action"
"#,
        )
        .unwrap();
        let run = resolve(
            &cli(&["--source", "$prefix-$action", "--ambiguity", "assign-all"]),
            file,
        )
        .unwrap();
        assert_eq!(run.source.template(), "$prefix-$action");
        assert_eq!(run.settings.ambiguity, AmbiguityPolicy::AssignAll);
    }

    #[test]
    fn dest_separator_alone_re_expresses_source_template() {
        let run = resolve(
            &cli(&["--source", "$prefix_$feature_$action", "--dest-sep", "none"]),
            FileConfig::default(),
        )
        .unwrap();
        let dest = run.destination.unwrap();
        assert_eq!(dest.template(), "$prefix$feature$action");
        assert!(dest.is_camel_case());
    }

    #[test]
    fn replaced_keywords() {
        let file = parse(
            r#"
[source]
template = "$feature_$action"
[keywords]
replace = ["Zap"]
"#,
        )
        .unwrap();
        let run = resolve(&cli(&[]), file).unwrap();
        assert_eq!(run.settings.keywords.len(), 1);
    }

    #[test]
    fn missing_source_template_is_an_error() {
        let err = resolve(&cli(&[]), FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no source template"));
    }

    #[test]
    fn bad_thresholds_and_templates_are_errors() {
        let bad_good = cli(&["--source", "$feature_$action", "--good", "0.95"]);
        assert!(resolve(&bad_good, FileConfig::default()).is_err());
        let bad_tag = cli(&["--source", "$feature$flavor"]);
        assert!(resolve(&bad_tag, FileConfig::default()).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("[source]\ntemplat = \"$action\"\n").is_err());
    }
}
