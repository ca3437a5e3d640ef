//! AST representing a single sigil.
//!
//! All spans are relative to the sigil source, i.e. the bracketed span as it
//! was extracted from the original text.

use crate::types::span::Span;
use crate::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Sigil {
    pub nodes: Vec<Node>,
    pub span: Span,
}

/// One dotted segment of a sigil, e.g. `ENV` or `ITEM=2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: Ident,
    pub arg: Option<Arg>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ident {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A nested sigil, e.g. `[SRC]` in `[ENV=[SRC]]`.
    Sigil(Sigil),
    /// A bare identifier, looked up in the context.
    Var(Ident),
    /// A string, integer, bool or null literal.
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub span: Span,
}

impl Sigil {
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }
}

impl Arg {
    pub fn span(&self) -> Span {
        match self {
            Arg::Sigil(sigil) => sigil.span,
            Arg::Var(ident) => ident.span,
            Arg::Literal(lit) => lit.span,
        }
    }
}
