use evmatch_template::{ParseError, ParseErrorKind, Tag};
use serde::Serialize;
use thiserror::Error;

/// Top-level error for callers that drive a whole analysis.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(
        "invalid confidence thresholds good={good}, perfect={perfect} (need 0 <= good <= perfect <= 1)"
    )]
    InvalidThresholds { good: f64, perfect: f64 },
}

/// A template string that cannot be compiled into a `Pattern`.
///
/// This is a configuration error: it is raised before any name is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid template {template:?} at byte {at}: {kind}")]
pub struct PatternError {
    pub template: String,
    pub at: usize,
    pub kind: PatternErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternErrorKind {
    #[error("template is empty")]
    Empty,

    #[error("unknown placeholder ${0} (expected $prefix, $feature, $action or $variation)")]
    UnknownTag(String),

    #[error("placeholder ${0} appears more than once")]
    DuplicateTag(Tag),

    #[error("{0}")]
    Malformed(String),

    #[error("template has no placeholder")]
    NoPlaceholder,

    #[error("${first} and ${second} have no separator between them")]
    AmbiguousAdjacency { first: Tag, second: Tag },

    #[error("{0:?} cannot be used as a separator")]
    InvalidSeparator(char),

    #[error("separator list is empty")]
    NoSeparators,
}

impl PatternError {
    pub(crate) fn new(template: &str, at: usize, kind: PatternErrorKind) -> Self {
        Self {
            template: template.to_string(),
            at,
            kind,
        }
    }

    pub(crate) fn from_parse(template: &str, err: ParseError) -> Self {
        let kind = match err.kind {
            ParseErrorKind::EmptyTemplate => PatternErrorKind::Empty,
            ParseErrorKind::UnknownTag(name) => PatternErrorKind::UnknownTag(name),
            ParseErrorKind::DuplicateTag(tag) => PatternErrorKind::DuplicateTag(tag),
            ParseErrorKind::NoPlaceholder => PatternErrorKind::NoPlaceholder,
            ParseErrorKind::TokenizeFailed => PatternErrorKind::Malformed(err.message),
        };
        Self::new(template, err.at, kind)
    }
}

/// Components handed to `Pattern::build` lack a tag the pattern requires.
///
/// Raised per candidate; the matcher turns it into an orphan file rather than
/// aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("template {template:?} needs ${missing} but no value was parsed for it")]
pub struct BuildError {
    pub template: String,
    #[serde(serialize_with = "crate::components::serialize_tag")]
    pub missing: Tag,
}
