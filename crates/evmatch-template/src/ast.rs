// evmatch-template/src/ast.rs

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAst {
    pub parts: Vec<Part>,
}

impl TemplateAst {
    /// Placeholder tags in template order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.parts.iter().filter_map(|p| match p {
            Part::Placeholder(ph) => Some(ph.tag),
            Part::Literal(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Literal(LiteralPart),
    Placeholder(PlaceholderPart),
}

impl Part {
    pub fn span(&self) -> Span {
        match self {
            Part::Literal(l) => l.span,
            Part::Placeholder(p) => p.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralPart {
    /// Unescaped text (`$$` in the source becomes `$`).
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPart {
    pub tag: Tag,
    /// Span of the whole `$name`, including the dollar sign.
    pub span: Span,
}

/// The fixed set of component tags a template may reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Prefix,
    Feature,
    Action,
    Variation,
}

impl Tag {
    pub const ALL: [Tag; 4] = [Tag::Prefix, Tag::Feature, Tag::Action, Tag::Variation];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Prefix => "prefix",
            Tag::Feature => "feature",
            Tag::Action => "action",
            Tag::Variation => "variation",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tag {:?}", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for Tag {
    type Err = UnknownTag;

    /// Tag names are matched case-insensitively (`$Prefix` == `$prefix`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Byte span in the original template string.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize, // inclusive
    pub end: usize,   // exclusive
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn join(a: Span, b: Span) -> Span {
        Span {
            start: a.start.min(b.start),
            end: a.end.max(b.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_through_str() {
        for tag in Tag::ALL {
            assert_eq!(tag.as_str().parse::<Tag>().unwrap(), tag);
        }
    }

    #[test]
    fn tag_parse_ignores_case() {
        assert_eq!("Feature".parse::<Tag>().unwrap(), Tag::Feature);
        assert_eq!("ACTION".parse::<Tag>().unwrap(), Tag::Action);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "flavor".parse::<Tag>().unwrap_err();
        assert_eq!(err, UnknownTag("flavor".into()));
    }

    #[test]
    fn span_join_covers_both() {
        assert_eq!(Span::join(Span::new(4, 6), Span::new(1, 2)), Span::new(1, 6));
    }
}
