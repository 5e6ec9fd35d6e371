mod components;
mod error;
mod keywords;
mod matcher;
mod normalize;
mod pattern;
mod report;
mod settings;
mod severity;

pub use components::{Components, ParseMiss, ParseStrategy, ParsedName};
pub use error::{BuildError, Error, PatternError, PatternErrorKind};
pub use evmatch_template::Tag;
pub use keywords::{ActionKeywords, DEFAULT_ACTION_KEYWORDS, KeywordMatch};
pub use matcher::{Matcher, analyze_templates};
pub use normalize::{file_stem_of, normalize_name, pascal_case, split_words, strip_extension};
pub use pattern::{Pattern, Segment, Separators};
pub use report::{
    AnalysisReport, Diagnostic, MatchGroup, MatchTier, OrphanFile, OrphanReason, Summary,
};
pub use settings::{AmbiguityPolicy, ConfidenceClass, MatchSettings, Thresholds};
pub use severity::Severity;
