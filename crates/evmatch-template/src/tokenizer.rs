// evmatch-template/src/tokenizer.rs

use std::fmt;

/// Token kinds produced by the template tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `$name`. The value is the name without the dollar sign.
    Placeholder(String),

    /// An unbroken run of text that is not a placeholder. May be empty only
    /// if the input is empty (which yields no tokens at all).
    LiteralRun(String),

    /// `$$`, a literal dollar sign.
    EscapedDollar,
}

/// Token with span information (byte offsets in the original input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub start: usize, // inclusive
    pub end: usize,   // exclusive
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeErrorKind {
    /// `$` at end of input.
    DanglingDollar,
    /// `$` followed by something that cannot start a tag name.
    InvalidTagStart(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    pub kind: TokenizeErrorKind,
    pub at: usize, // byte offset
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenizeErrorKind::*;
        match self.kind {
            DanglingDollar => write!(f, "'$' at byte {} is not followed by a tag name", self.at),
            InvalidTagStart(c) => {
                write!(f, "invalid tag name start {:?} after '$' at byte {}", c, self.at)
            }
        }
    }
}

impl std::error::Error for TokenizeError {}

/// Tokenizer for a naming template such as `$prefix_$feature_$action`.
///
/// - `$` followed by ASCII letters => Placeholder (the letter run is the name)
/// - `$$` => EscapedDollar
/// - anything else: LiteralRun up to the next `$`
///
/// Tag names stop at the first non-letter, so `$prefix_$feature` yields
/// `prefix`, `_`, `feature` and `$prefix$feature` yields two adjacent
/// placeholders.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize, // byte offset
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub fn tokenize_all(mut self) -> Result<Vec<SpannedToken>, TokenizeError> {
        let mut out = Vec::new();
        while let Some(tok) = self.next_token()? {
            out.push(tok);
        }
        Ok(out)
    }

    /// Returns next spanned token, or Ok(None) at end-of-input.
    pub fn next_token(&mut self) -> Result<Option<SpannedToken>, TokenizeError> {
        let Some(b) = self.peek_byte() else {
            return Ok(None);
        };
        let start = self.pos;

        if b != b'$' {
            let end = self.scan_until(b'$');
            self.pos = end;
            return Ok(Some(SpannedToken {
                token: Token::LiteralRun(self.input[start..end].to_string()),
                start,
                end,
            }));
        }

        match self.peek_byte_at(self.pos + 1) {
            None => Err(TokenizeError {
                kind: TokenizeErrorKind::DanglingDollar,
                at: start,
            }),
            Some(b'$') => {
                self.pos += 2;
                Ok(Some(SpannedToken {
                    token: Token::EscapedDollar,
                    start,
                    end: self.pos,
                }))
            }
            Some(next) if next.is_ascii_alphabetic() => {
                self.pos += 1;
                let end = self.scan_while(|b| b.is_ascii_alphabetic());
                let name = self.input[self.pos..end].to_string();
                self.pos = end;
                Ok(Some(SpannedToken {
                    token: Token::Placeholder(name),
                    start,
                    end,
                }))
            }
            Some(_) => {
                let ch = self.input[start + 1..].chars().next().unwrap_or('\0');
                Err(TokenizeError {
                    kind: TokenizeErrorKind::InvalidTagStart(ch),
                    at: start,
                })
            }
        }
    }

    fn scan_until(&self, stop: u8) -> usize {
        // '$' is ASCII, so a byte search never lands inside a UTF-8 sequence.
        self.input.as_bytes()[self.pos..]
            .iter()
            .position(|&b| b == stop)
            .map_or(self.input.len(), |i| self.pos + i)
    }

    fn scan_while<F>(&self, mut pred: F) -> usize
    where
        F: FnMut(u8) -> bool,
    {
        let mut i = self.pos;
        while i < self.input.len() {
            let b = self.input.as_bytes()[i];
            if !pred(b) {
                break;
            }
            i += 1;
        }
        i
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_byte_at(&self, pos: usize) -> Option<u8> {
        self.input.as_bytes().get(pos).copied()
    }
}
