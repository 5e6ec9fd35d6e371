// evmatch-template/src/parser.rs

use crate::ast::*;
use crate::tokenizer::{SpannedToken, Token, TokenizeError, Tokenizer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    TokenizeFailed,
    EmptyTemplate,
    UnknownTag(String),
    DuplicateTag(Tag),
    NoPlaceholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub at: usize,          // byte offset
    pub span: Option<Span>, // token span if available
    pub message: String,
}

impl ParseError {
    fn new(
        kind: ParseErrorKind,
        at: usize,
        span: Option<Span>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            at,
            span,
            message: message.into(),
        }
    }

    fn from_tokenize(err: TokenizeError) -> Self {
        Self {
            kind: ParseErrorKind::TokenizeFailed,
            at: err.at,
            span: Some(Span::new(err.at, err.at + 1)),
            message: format!("{}", err),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "at byte {}: {}", self.at, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse a naming template into a TemplateAst.
///
/// Adjacent literal tokens (including `$$` escapes) are merged into a single
/// `LiteralPart`, so the resulting parts alternate between literal and
/// placeholder except where two placeholders touch. Whether touching
/// placeholders are acceptable depends on the separator mode and is left to
/// the caller.
pub fn parse_template(input: &str) -> Result<TemplateAst, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::EmptyTemplate,
            0,
            None,
            "template is empty",
        ));
    }

    let tokens = Tokenizer::new(input)
        .tokenize_all()
        .map_err(ParseError::from_tokenize)?;
    tracing::trace!(template = input, tokens = tokens.len(), "tokenized template");

    let mut c = Cursor::new(&tokens);
    let mut parts: Vec<Part> = Vec::new();
    let mut seen: Vec<(Tag, Span)> = Vec::new();

    while let Some(t) = c.bump() {
        let span = Span::new(t.start, t.end);
        match &t.token {
            Token::LiteralRun(s) => push_literal(&mut parts, s, span),
            Token::EscapedDollar => push_literal(&mut parts, "$", span),
            Token::Placeholder(name) => {
                let tag = name.parse::<Tag>().map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::UnknownTag(name.clone()),
                        t.start,
                        Some(span),
                        format!(
                            "unknown placeholder ${}; expected one of $prefix, $feature, $action, $variation",
                            name
                        ),
                    )
                })?;

                if let Some((_, first)) = seen.iter().find(|(s, _)| *s == tag) {
                    return Err(ParseError::new(
                        ParseErrorKind::DuplicateTag(tag),
                        t.start,
                        Some(span),
                        format!(
                            "placeholder ${} already appears at byte {}",
                            tag, first.start
                        ),
                    ));
                }
                seen.push((tag, span));
                parts.push(Part::Placeholder(PlaceholderPart { tag, span }));
            }
        }
    }

    if seen.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::NoPlaceholder,
            0,
            Some(Span::new(0, input.len())),
            "template contains no placeholder",
        ));
    }

    Ok(TemplateAst { parts })
}

fn push_literal(parts: &mut Vec<Part>, text: &str, span: Span) {
    if let Some(Part::Literal(prev)) = parts.last_mut() {
        prev.value.push_str(text);
        prev.span = Span::join(prev.span, span);
        return;
    }
    parts.push(Part::Literal(LiteralPart {
        value: text.to_string(),
        span,
    }));
}

/// Simple cursor over spanned tokens.
struct Cursor<'a> {
    toks: &'a [SpannedToken],
    i: usize,
}

impl<'a> Cursor<'a> {
    fn new(toks: &'a [SpannedToken]) -> Self {
        Self { toks, i: 0 }
    }

    fn bump(&mut self) -> Option<&'a SpannedToken> {
        let t = self.toks.get(self.i);
        if t.is_some() {
            self.i += 1;
        }
        t
    }
}
