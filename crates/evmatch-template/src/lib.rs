pub mod ast;
pub mod parser;
pub mod tokenizer;

pub use ast::*;
pub use parser::{ParseError, ParseErrorKind, parse_template};
