use std::fmt::Display;

use crate::compile::lex::{Lexer, Token};
use crate::types::ast;
use crate::types::span::Span;
use crate::types::syntax::Syntax;
use crate::{Error, Result, Value};

/// A parser that constructs an AST from the token stream of a single sigil.
///
/// ```text
/// sigil    := BEGIN node ("." member)* END
/// node     := NAME ["=" argument]
/// member   := (NAME | INDEX) ["=" argument]
/// argument := sigil | string | ["-"] integer | ident | bool | null
/// ```
pub struct Parser<'a> {
    /// A lexer that tokenizes the sigil source.
    tokens: Lexer<'a>,

    /// Store the next token.
    ///
    /// - `None` means we don't know the next token yet.
    /// - `Some(None)` means the lexer is exhausted.
    peeked: Option<Option<(Token, Span)>>,
}

/// Identifiers with a special meaning in argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    True,
    False,
    Null,
}

enum Sign {
    Pos,
    Neg,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.
    pub fn new(syntax: &'a Syntax<'a>, source: &'a str) -> Self {
        Self {
            tokens: Lexer::new(syntax, source),
            peeked: None,
        }
    }

    /// Parses the whole source as one sigil, trailing tokens are an error.
    pub fn parse_sigil(mut self) -> Result<ast::Sigil> {
        let sigil = self.parse_nested()?;
        match self.next()? {
            Some((tk, span)) => Err(self.err_unexpected_token("end of sigil", tk, span)),
            None => Ok(sigil),
        }
    }

    /// Parses a sigil, this is also used for sigils in argument position.
    fn parse_nested(&mut self) -> Result<ast::Sigil> {
        let begin = self.expect(Token::Begin)?;
        let root = self.parse_ident()?;
        let mut nodes = vec![self.parse_node(root)?];
        let end = loop {
            match self.next()? {
                Some((Token::Dot, _)) => {
                    let name = self.parse_member()?;
                    nodes.push(self.parse_node(name)?);
                }
                Some((Token::End, span)) => break span,
                Some((tk, span)) => {
                    return Err(self.err_unexpected_token(
                        "member access operator or end delimiter",
                        tk,
                        span,
                    ));
                }
                None => return Err(self.err_unexpected_eof(Token::End.human())),
            }
        };
        Ok(ast::Sigil {
            nodes,
            span: begin.combine(end),
        })
    }

    fn parse_node(&mut self, name: ast::Ident) -> Result<ast::Node> {
        let arg = if self.is_next(Token::Equals)? {
            self.expect(Token::Equals)?;
            Some(self.parse_arg()?)
        } else {
            None
        };
        let span = match &arg {
            Some(arg) => name.span.combine(arg.span()),
            None => name.span,
        };
        Ok(ast::Node { name, arg, span })
    }

    fn parse_arg(&mut self) -> Result<ast::Arg> {
        if self.is_next(Token::Begin)? {
            return Ok(ast::Arg::Sigil(self.parse_nested()?));
        }

        let arg = match self.parse()? {
            (Token::String, span) => ast::Arg::Literal(self.parse_literal_string(span)),
            (Token::Number, span) => {
                let lit = self.parse_literal_integer(span, span, Sign::Pos)?;
                ast::Arg::Literal(lit)
            }
            (Token::Minus, minus) => {
                let span = self.expect(Token::Number)?;
                let lit = self.parse_literal_integer(span, minus.combine(span), Sign::Neg)?;
                ast::Arg::Literal(lit)
            }
            (Token::Ident, span) => match Keyword::from_str(&self.source()[span]) {
                Some(kw) => {
                    let value = match kw {
                        Keyword::True => Value::Bool(true),
                        Keyword::False => Value::Bool(false),
                        Keyword::Null => Value::None,
                    };
                    ast::Arg::Literal(ast::Literal { value, span })
                }
                None => ast::Arg::Var(ast::Ident { span }),
            },
            (tk, span) => {
                return Err(self.err_unexpected_token("argument", tk, span));
            }
        };
        Ok(arg)
    }

    fn parse_literal_string(&self, span: Span) -> ast::Literal {
        let raw = &self.source()[span];
        let value = Value::String(raw[1..raw.len() - 1].to_owned());
        ast::Literal { value, span }
    }

    /// Parses the digits in `digits`, the literal spans `span` which
    /// includes the sign if there is one.
    fn parse_literal_integer(&self, digits: Span, span: Span, sign: Sign) -> Result<ast::Literal> {
        let err = || {
            Error::parse(
                "integer literal out of range for 64-bit integer",
                self.source(),
                span,
            )
        };
        let int = self.source()[digits]
            .bytes()
            .try_fold(0i64, |acc, d| {
                let x = i64::from(d - b'0');
                let value = acc.checked_mul(10)?;
                match sign {
                    Sign::Pos => value.checked_add(x),
                    Sign::Neg => value.checked_sub(x),
                }
            })
            .ok_or_else(err)?;
        Ok(ast::Literal {
            value: Value::Integer(int),
            span,
        })
    }

    fn parse_ident(&mut self) -> Result<ast::Ident> {
        let span = self.expect(Token::Ident)?;
        Ok(ast::Ident { span })
    }

    /// Parses the name of a chained node, which may also be a list index
    /// such as `1` in `[HOSTS.1]`.
    fn parse_member(&mut self) -> Result<ast::Ident> {
        match self.next()? {
            Some((Token::Ident | Token::Number, span)) => Ok(ast::Ident { span }),
            Some((tk, span)) => Err(self.err_unexpected_token("identifier or index", tk, span)),
            None => Err(self.err_unexpected_eof("identifier or index")),
        }
    }

    /// Returns the next token, an error if there is none.
    fn parse(&mut self) -> Result<(Token, Span)> {
        match self.next()? {
            Some(next) => Ok(next),
            None => Err(self.err_unexpected_eof("argument")),
        }
    }

    /// Returns the span of the next token, an error if it is not `exp`.
    fn expect(&mut self, exp: Token) -> Result<Span> {
        match self.next()? {
            Some((tk, span)) if tk == exp => Ok(span),
            Some((tk, span)) => Err(self.err_unexpected_token(exp.human(), tk, span)),
            None => Err(self.err_unexpected_eof(exp.human())),
        }
    }

    /// Returns `true` if the next token is `token`.
    fn is_next(&mut self, token: Token) -> Result<bool> {
        Ok(self.peek()?.map(|(tk, _)| tk == token).unwrap_or(false))
    }

    fn peek(&mut self) -> Result<Option<(Token, Span)>> {
        match self.peeked {
            Some(next) => Ok(next),
            None => {
                let next = self.tokens.next()?;
                self.peeked = Some(next);
                Ok(next)
            }
        }
    }

    fn next(&mut self) -> Result<Option<(Token, Span)>> {
        match self.peeked.take() {
            Some(v) => Ok(v),
            None => self.tokens.next(),
        }
    }

    fn source(&self) -> &'a str {
        self.tokens.source
    }

    fn err_unexpected_eof(&self, exp: impl Display) -> Error {
        let n = self.source().len();
        Error::parse(format!("expected {exp}, found EOF"), self.source(), n..n)
    }

    fn err_unexpected_token(&self, exp: impl Display, got: Token, span: Span) -> Error {
        let got = got.human();
        Error::parse(format!("expected {exp}, found {got}"), self.source(), span)
    }
}

impl Keyword {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "true" | "True" => Some(Self::True),
            "false" | "False" => Some(Self::False),
            "NULL" | "null" | "None" => Some(Self::Null),
            _ => None,
        }
    }
}
