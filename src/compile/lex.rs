use crate::types::span::Span;
use crate::types::syntax::Syntax;
use crate::{Error, Result};

/// A lexer that tokenizes a single sigil so that the parser doesn't have to
/// operate on raw text.
///
/// The lexer is implemented as a fallible iterator. The parser should
/// repeatedly call the [`.next()?`][Lexer::next] method to return the next
/// non-whitespace token until [`None`] is returned.
pub struct Lexer<'a> {
    /// The delimiters.
    syntax: &'a Syntax<'a>,

    /// The sigil source, including the outer delimiters.
    pub source: &'a str,

    /// A cursor over the sigil source.
    cursor: usize,
}

/// The unit yielded by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Begin delimiter, e.g. `[`
    Begin,
    /// End delimiter, e.g. `]`
    End,
    /// `.`
    Dot,
    /// `=`
    Equals,
    /// `-`
    Minus,
    /// Sequence of tabs, spaces and newlines
    Whitespace,
    /// A node name, variable or keyword
    Ident,
    /// An integer literal, e.g. `42`
    Number,
    /// A quoted string literal, e.g. `'World'` or `"World"`
    String,
}

impl<'a> Lexer<'a> {
    /// Construct a new lexer.
    pub fn new(syntax: &'a Syntax<'a>, source: &'a str) -> Self {
        Self {
            syntax,
            source,
            cursor: 0,
        }
    }

    /// Returns the next non-whitespace token and its span.
    pub fn next(&mut self) -> Result<Option<(Token, Span)>> {
        loop {
            match self.lex()? {
                Some((tk, sp)) if !tk.is_whitespace() => return Ok(Some((tk, sp))),
                None => return Ok(None),
                _ => continue,
            }
        }
    }

    /// Returns the next token and span.
    fn lex(&mut self) -> Result<Option<(Token, Span)>> {
        let i = self.cursor;
        let rest = &self.source[i..];

        if rest.is_empty() {
            return Ok(None);
        }

        // Delimiters take precedence over single characters, e.g. a custom
        // `-[` begin delimiter is not a minus.
        let (tk, j) = if rest.starts_with(self.syntax.begin.as_str()) {
            (Token::Begin, i + self.syntax.begin.len())
        } else if rest.starts_with(self.syntax.end.as_str()) {
            (Token::End, i + self.syntax.end.len())
        } else {
            // The map call here fixes the index to be relative to the sigil
            // source.
            let mut iter = rest.char_indices().map(|(d, c)| (i + d, c));

            let Some((i, c)) = iter.next() else {
                return Ok(None);
            };

            match c {
                '.' => (Token::Dot, i + 1),
                '=' => (Token::Equals, i + 1),
                '-' => (Token::Minus, i + 1),
                '\'' | '"' => self.lex_string(iter, i, c)?,
                c if c.is_ascii_digit() => (Token::Number, self.lex_while(iter, is_digit)),
                c if is_whitespace(c) => (Token::Whitespace, self.lex_while(iter, is_whitespace)),
                c if is_ident_start(c) => (Token::Ident, self.lex_while(iter, is_ident)),
                _ => {
                    return Err(self.err_unexpected_character(i..(i + c.len_utf8())));
                }
            }
        };

        self.cursor = j;
        Ok(Some((tk, Span::from(i..j))))
    }

    /// Lexes a quoted string, there are no escape sequences so the string
    /// ends at the next matching quote.
    fn lex_string<I>(&mut self, mut iter: I, i: usize, quote: char) -> Result<(Token, usize)>
    where
        I: Iterator<Item = (usize, char)>,
    {
        match iter.find(|&(_, c)| c == quote) {
            Some((j, _)) => Ok((Token::String, j + 1)),
            None => Err(self.err_undelimited_string(i..self.source.len())),
        }
    }

    fn lex_while<I, P>(&mut self, mut iter: I, pred: P) -> usize
    where
        I: Iterator<Item = (usize, char)>,
        P: Fn(char) -> bool,
    {
        match iter.find(|&(_, c)| !pred(c)) {
            Some((j, _)) => j,
            None => self.source.len(),
        }
    }

    fn err_unexpected_character(&self, span: impl Into<Span>) -> Error {
        Error::parse("unexpected character", self.source, span)
    }

    fn err_undelimited_string(&self, span: impl Into<Span>) -> Error {
        Error::parse("undelimited string", self.source, span)
    }
}

impl Token {
    pub fn human(&self) -> &'static str {
        match self {
            Self::Begin => "begin delimiter",
            Self::End => "end delimiter",
            Self::Dot => "member access operator",
            Self::Equals => "argument operator",
            Self::Minus => "minus",
            Self::Whitespace => "whitespace",
            Self::Ident => "identifier",
            Self::Number => "number",
            Self::String => "string",
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | ' ' | '\n' | '\r')
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

#[cfg(feature = "unicode")]
fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

#[cfg(feature = "unicode")]
fn is_ident(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

#[cfg(not(feature = "unicode"))]
fn is_ident_start(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '_')
}

#[cfg(not(feature = "unicode"))]
fn is_ident(c: char) -> bool {
    matches!(c, '0'..='9' | 'A'..='Z' | 'a'..='z' | '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_empty() {
        let tokens = lex("").unwrap();
        assert_eq!(tokens, []);
    }

    #[test]
    fn lex_simple() {
        let tokens = lex("[ENV.HOST]").unwrap();
        assert_eq!(
            tokens,
            [
                (Token::Begin, "["),
                (Token::Ident, "ENV"),
                (Token::Dot, "."),
                (Token::Ident, "HOST"),
                (Token::End, "]"),
            ]
        );
    }

    #[test]
    fn lex_arguments() {
        let tokens = lex("[A='x y'.B=\"z\".C=-12 ]").unwrap();
        assert_eq!(
            tokens,
            [
                (Token::Begin, "["),
                (Token::Ident, "A"),
                (Token::Equals, "="),
                (Token::String, "'x y'"),
                (Token::Dot, "."),
                (Token::Ident, "B"),
                (Token::Equals, "="),
                (Token::String, "\"z\""),
                (Token::Dot, "."),
                (Token::Ident, "C"),
                (Token::Equals, "="),
                (Token::Minus, "-"),
                (Token::Number, "12"),
                (Token::Whitespace, " "),
                (Token::End, "]"),
            ]
        );
    }

    #[test]
    fn lex_nested() {
        let tokens = lex("[ENV=[SRC]]").unwrap();
        assert_eq!(
            tokens,
            [
                (Token::Begin, "["),
                (Token::Ident, "ENV"),
                (Token::Equals, "="),
                (Token::Begin, "["),
                (Token::Ident, "SRC"),
                (Token::End, "]"),
                (Token::End, "]"),
            ]
        );
    }

    #[test]
    fn lex_string_keeps_other_quote() {
        let tokens = lex(r#"[A="it's"]"#).unwrap();
        assert_eq!(tokens[3], (Token::String, r#""it's""#));
    }

    #[test]
    fn lex_whitespace_newlines() {
        let tokens = lex("[ A\n\t.B ]").unwrap();
        assert_eq!(tokens[1], (Token::Whitespace, " "));
        assert_eq!(tokens[3], (Token::Whitespace, "\n\t"));
    }

    #[test]
    fn lex_custom_delims() {
        let syntax = Syntax::builder().delims("<<", ">>").build();
        let source = "<<A=<<B>>>>";
        let mut lexer = Lexer::new(&syntax, source);
        let mut tokens = Vec::new();
        while let Some((tk, sp)) = lexer.next().unwrap() {
            tokens.push((tk, &source[sp]));
        }
        assert_eq!(
            tokens,
            [
                (Token::Begin, "<<"),
                (Token::Ident, "A"),
                (Token::Equals, "="),
                (Token::Begin, "<<"),
                (Token::Ident, "B"),
                (Token::End, ">>"),
                (Token::End, ">>"),
            ]
        );
    }

    #[test]
    fn lex_err_undelimited_string() {
        let err = lex("[A='x]").unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "
   |
 1 | [A='x]
   |    ^^^ undelimited string
"
        );
    }

    #[test]
    fn lex_err_unexpected_character() {
        let err = lex("[A|B]").unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "
   |
 1 | [A|B]
   |   ^ unexpected character
"
        );
    }

    fn lex(source: &str) -> Result<Vec<(Token, &str)>> {
        let syntax = Syntax::default();
        let mut lexer = Lexer::new(&syntax, source);
        let mut tokens = Vec::new();
        while let Some((tk, sp)) = lexer.lex()? {
            tokens.push((tk, &source[sp]));
        }
        for _ in 0..3 {
            assert!(lexer.lex().unwrap().is_none());
        }
        Ok(tokens)
    }
}
