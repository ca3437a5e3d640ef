use std::cmp::max;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::types::span::Span;

/// An error that can occur while parsing or resolving sigils.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    span: Option<(String, Span)>,
    cause: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

/// The category of an [`Error`].
///
/// Resolution misses ([`KeyNotFound`][ErrorKind::KeyNotFound],
/// [`FieldNotFound`][ErrorKind::FieldNotFound],
/// [`Callable`][ErrorKind::Callable],
/// [`TypeMismatch`][ErrorKind::TypeMismatch] and
/// [`NoneValue`][ErrorKind::NoneValue]) are subject to the
/// [`OnError`][crate::OnError] policy. All other kinds are always returned to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The sigil does not match the grammar.
    Parse,
    /// The root node was not found in the context.
    KeyNotFound,
    /// A chained node matched no item, field or function.
    FieldNotFound,
    /// A registered function or record manager failed.
    Callable,
    /// A value had the wrong type, e.g. a function argument or an arithmetic
    /// operand.
    TypeMismatch,
    /// The sigil resolved to [`Value::None`][crate::Value::None].
    NoneValue,
    /// The context scope or cache was used out of order.
    CacheInconsistency,
    /// A value could not be converted using serde.
    Serialize,
    /// Writing the output failed.
    Io,
}

impl Error {
    /// Construct a new error with a message.
    ///
    /// This is the error that registered functions should return when they
    /// fail, it is reported as [`ErrorKind::Callable`].
    pub fn new(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Callable, msg)
    }

    pub(crate) fn with_kind(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            span: None,
            cause: None,
        }
    }

    pub(crate) fn parse(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::with_kind(ErrorKind::Parse, msg).enrich(source, span)
    }

    pub(crate) fn key_not_found(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::KeyNotFound, msg)
    }

    pub(crate) fn field_not_found(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::FieldNotFound, msg)
    }

    pub(crate) fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::TypeMismatch, msg)
    }

    pub(crate) fn cache_inconsistency(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::CacheInconsistency, msg)
    }

    /// Wraps an error raised inside a function or manager call.
    ///
    /// Type mismatches keep their kind, everything else becomes
    /// [`ErrorKind::Callable`] with the original error as the cause.
    pub(crate) fn callable(name: &str, err: Error) -> Self {
        match err.kind {
            ErrorKind::TypeMismatch => err,
            _ => Self {
                kind: ErrorKind::Callable,
                msg: format!("function `{name}` failed: {}", err.msg),
                span: None,
                cause: Some(Arc::new(err)),
            },
        }
    }

    /// Attaches the sigil source and span to this error, unless it already
    /// has a more specific one. An empty source has nothing to point at and
    /// is not attached.
    pub(crate) fn enrich(mut self, source: &str, span: impl Into<Span>) -> Self {
        if self.span.is_none() && !source.is_empty() {
            self.span = Some((source.to_owned(), span.into()));
        }
        self
    }

    /// Returns the category of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the sigil this error was raised for, if known.
    #[inline]
    pub fn sigil(&self) -> Option<&str> {
        self.span.as_ref().map(|(source, _)| source.as_str())
    }

    /// Returns `true` if the [`OnError`][crate::OnError] policy applies to
    /// this error.
    pub fn is_resolution_miss(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::KeyNotFound
                | ErrorKind::FieldNotFound
                | ErrorKind::Callable
                | ErrorKind::TypeMismatch
                | ErrorKind::NoneValue
        )
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            msg: format!("io error: {err}"),
            span: None,
            cause: Some(Arc::new(err)),
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::with_kind(ErrorKind::Io, "failed to format value")
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::with_kind(ErrorKind::Serialize, msg.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => fmt_pretty(&self.msg, source, *span, f),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => {
                if f.alternate() {
                    fmt_pretty(&self.msg, source, *span, f)
                } else {
                    write!(f, "{} in sigil `{}`", self.msg, source)
                }
            }
            None => write!(f, "{}", self.msg),
        }
    }
}

fn fmt_pretty(msg: &str, source: &str, span: Span, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lines: Vec<_> = source.split_terminator('\n').collect();
    let (line, col) = to_line_col(&lines, span.m);
    let width = max(1, width(&source[span]));
    let code = lines
        .get(line)
        .or_else(|| lines.last())
        .copied()
        .unwrap_or_default();

    let num = (line + 1).to_string();
    let pad = num.len();
    let pipe = "|";
    let underline = "^".repeat(width);

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + width,
        msg = msg
    )
}

fn to_line_col(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;
    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            return (i, width(&line[..offset - n]));
        }
        n += len;
    }
    (
        lines.len().saturating_sub(1),
        lines.last().map(|l| width(l)).unwrap_or(0),
    )
}

#[cfg(feature = "unicode")]
fn width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(not(feature = "unicode"))]
fn width(s: &str) -> usize {
    s.chars().count()
}
