mod args;
mod config;
mod render;

use crate::args::Cli;
use crate::config::FileConfig;
use anyhow::{Context, Result, bail};
use clap::Parser;
use evmatch_core::{AnalysisReport, Matcher};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

/// Exit status when `--fail-on-orphans` is set and something went unmatched.
const EXIT_ORPHANS: u8 = 1;
/// Exit status for configuration, template and I/O errors.
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let outcome = analyze(&cli);
    match &outcome {
        Ok(report) => {
            print!("{}", render::render(report, cli.format, cli.verbosity, cli.quiet));
            if cli.format == args::OutputFormat::Json {
                println!();
            }
        }
        Err(e) => eprintln!("evmatch: {e:#}"),
    }
    ExitCode::from(exit_code(&outcome, cli.fail_on_orphans))
}

/// `RUST_LOG` wins; otherwise `-v` selects debug and `-vv` trace.
fn init_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .init();
}

fn analyze(cli: &Cli) -> Result<AnalysisReport> {
    let file_config = match cli.config.as_deref() {
        Some(path) => config::load(path)?,
        None => FileConfig::default(),
    };
    let run = config::resolve(cli, file_config)?;

    if is_stdin(&cli.files) && is_stdin(&cli.expected) {
        bail!("--files and --expected cannot both read stdin");
    }
    let files = read_list(&cli.files).context("reading --files")?;
    let expected = read_list(&cli.expected).context("reading --expected")?;

    Ok(Matcher::new(run.settings).analyze(
        &files,
        &run.source,
        run.destination.as_ref(),
        &expected,
    ))
}

fn exit_code(outcome: &Result<AnalysisReport>, fail_on_orphans: bool) -> u8 {
    match outcome {
        Err(_) => EXIT_ERROR,
        Ok(report) if fail_on_orphans && report.has_orphans() => EXIT_ORPHANS,
        Ok(_) => 0,
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// One entry per line; blank lines and `#` comments are skipped.
fn read_list(path: &Path) -> Result<Vec<String>> {
    let text = if is_stdin(path) {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("opening {}", path.display()))?
    };
    Ok(parse_list(&text))
}

fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn list_skips_blanks_and_comments() {
        let text = "# audio\nSfx_Dragon_Attack.wav\n\n  Ui_Menu_Open.wav  \n";
        assert_eq!(parse_list(text), vec!["Sfx_Dragon_Attack.wav", "Ui_Menu_Open.wav"]);
    }

    #[test]
    fn reads_list_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "EventA\nEventB").unwrap();
        assert_eq!(read_list(tmp.path()).unwrap(), vec!["EventA", "EventB"]);
    }

    #[test]
    fn missing_list_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_list(&dir.path().join("nope.txt")).unwrap_err();
        assert!(format!("{err:#}").contains("nope.txt"));
    }

    fn cli_for(dir: &Path, source: &str, extra: &[&str]) -> Cli {
        let files = dir.join("files.txt");
        let expected = dir.join("expected.txt");
        fs::write(&files, "Sfx_Dragon_Attack.wav\nSfx_Goblin_Zzz.wav\n").unwrap();
        fs::write(&expected, "SfxDragonAttack\n").unwrap();
        let mut argv = vec![
            "evmatch".to_string(),
            "--files".to_string(),
            files.display().to_string(),
            "--expected".to_string(),
            expected.display().to_string(),
            "--source".to_string(),
            source.to_string(),
            "--dest-sep".to_string(),
            "none".to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn orphans_fail_the_run_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();

        let cli = cli_for(dir.path(), "$prefix_$feature_$action", &[]);
        let outcome = analyze(&cli);
        assert!(outcome.as_ref().unwrap().has_orphans());
        assert_eq!(exit_code(&outcome, cli.fail_on_orphans), 0);

        let cli = cli_for(dir.path(), "$prefix_$feature_$action", &["--fail-on-orphans"]);
        assert_eq!(exit_code(&analyze(&cli), cli.fail_on_orphans), EXIT_ORPHANS);
    }

    #[test]
    fn clean_run_exits_zero_with_fail_on_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_for(dir.path(), "$prefix_$feature_$action", &["--fail-on-orphans"]);
        fs::write(&cli.files, "Sfx_Dragon_Attack.wav\n").unwrap();
        let outcome = analyze(&cli);
        assert_eq!(outcome.as_ref().unwrap().summary().exact, 1);
        assert_eq!(exit_code(&outcome, true), 0);
    }

    #[test]
    fn configuration_errors_exit_with_two() {
        let dir = tempfile::tempdir().unwrap();

        let bad_template = cli_for(dir.path(), "$feature$flavor", &["--fail-on-orphans"]);
        assert_eq!(exit_code(&analyze(&bad_template), true), EXIT_ERROR);

        let bad_threshold = cli_for(dir.path(), "$prefix_$feature_$action", &["--good", "2"]);
        assert_eq!(exit_code(&analyze(&bad_threshold), false), EXIT_ERROR);

        let mut missing = cli_for(dir.path(), "$prefix_$feature_$action", &[]);
        missing.files = dir.path().join("absent.txt");
        assert_eq!(exit_code(&analyze(&missing), false), EXIT_ERROR);
    }
}
