//! Turn raw text into sigils that can be resolved.
//!
//! This process has three stages:
//! - The extractor finds the top level sigils in the text.
//! - The lexer chunks a single sigil into tokens.
//! - The parser constructs an AST from the token stream.

mod extract;
mod lex;
mod parse;

pub use crate::compile::extract::{contains_sigil, spans};
use crate::types::ast;
use crate::types::syntax::Syntax;
use crate::Result;

/// Parse a single sigil, including its delimiters.
pub fn sigil(syntax: &Syntax<'_>, source: &str) -> Result<ast::Sigil> {
    parse::Parser::new(syntax, source).parse_sigil()
}
