use clap::{Parser, ValueEnum};
use evmatch_core::AmbiguityPolicy;
use std::path::PathBuf;

/// evmatch: match audio asset files to expected event names.
#[derive(Debug, Parser)]
#[command(name = "evmatch")]
#[command(
    about = "Match audio asset files to expected event names using naming templates",
    long_about = None
)]
pub struct Cli {
    /// File listing candidate audio paths, one per line ("-" reads stdin)
    #[arg(long, value_name = "PATH")]
    pub files: PathBuf,

    /// File listing expected event names, one per line ("-" reads stdin)
    #[arg(long, value_name = "PATH")]
    pub expected: PathBuf,

    /// Template the audio files follow, e.g. '$prefix_$feature_$action'
    #[arg(long, value_name = "TEMPLATE")]
    pub source: Option<String>,

    /// Template event names follow (defaults to the source template)
    #[arg(long, value_name = "TEMPLATE")]
    pub dest: Option<String>,

    /// Separator characters for the source template ("none" for CamelCase)
    #[arg(long, value_name = "CHARS")]
    pub source_sep: Option<String>,

    /// Separator characters for the destination template ("none" for CamelCase)
    #[arg(long, value_name = "CHARS")]
    pub dest_sep: Option<String>,

    /// TOML configuration file; command-line flags override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Confidence at or above which a match is classed as good
    #[arg(long)]
    pub good: Option<f64>,

    /// Confidence at or above which a match is classed as perfect
    #[arg(long)]
    pub perfect: Option<f64>,

    /// What to do when an action keyword matches several expected names
    #[arg(long, value_enum)]
    pub ambiguity: Option<AmbiguityArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Quiet output (print only orphans)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbosity (-v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Exit with status 1 when any file or expected name is left unmatched
    #[arg(long)]
    pub fail_on_orphans: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AmbiguityArg {
    FirstLexical,
    AssignAll,
    Orphan,
}

impl From<AmbiguityArg> for AmbiguityPolicy {
    fn from(arg: AmbiguityArg) -> Self {
        match arg {
            AmbiguityArg::FirstLexical => AmbiguityPolicy::FirstLexical,
            AmbiguityArg::AssignAll => AmbiguityPolicy::AssignAll,
            AmbiguityArg::Orphan => AmbiguityPolicy::Orphan,
        }
    }
}
