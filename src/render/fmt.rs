use std::fmt;
use std::fmt::Write;
use std::io;

use crate::{Error, Result, Value};

/// A [`std::fmt::Write`] façade.
///
/// A mutable reference to this struct is passed to formatter functions and
/// writing to it updates the underlying buffer.
pub struct Formatter<'a> {
    buf: &'a mut (dyn fmt::Write + 'a),
}

pub(crate) struct Writer<W> {
    writer: W,
    err: Option<io::Error>,
}

impl<'a> Formatter<'a> {
    pub(crate) fn with_string(buf: &'a mut String) -> Self {
        Self { buf }
    }

    pub(crate) fn with_writer<W>(buf: &'a mut Writer<W>) -> Self
    where
        W: io::Write,
    {
        Self { buf }
    }
}

impl fmt::Write for Formatter<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        fmt::Write::write_str(self.buf, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        fmt::Write::write_char(self.buf, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        fmt::Write::write_fmt(self.buf, args)
    }
}

impl<W> Writer<W>
where
    W: io::Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer, err: None }
    }

    pub fn take_err(&mut self) -> Option<io::Error> {
        self.err.take()
    }
}

impl<W> fmt::Write for Writer<W>
where
    W: io::Write,
{
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_all(s.as_bytes()).map_err(|e| {
            self.err = Some(e);
            fmt::Error
        })
    }
}

/// The default value formatter.
///
/// Values are formatted as follows:
/// - [`Value::None`]: empty string
/// - [`Value::Bool`]: `true` or `false`
/// - [`Value::Integer`] and [`Value::Float`]: using
///   [`Display`][std::fmt::Display]
/// - [`Value::String`]: the string, unescaped
/// - [`Value::Bytes`]: the bytes decoded as UTF-8, invalid sequences are
///   replaced
/// - [`Value::List`]: each element formatted and joined with `;`
/// - [`Value::Object`]: the text returned by
///   [`Object::to_text`][crate::Object::to_text]
///
/// Errors if the value is a [`Value::Map`], a [`Value::Func`] or an object
/// without a text representation.
pub fn format(f: &mut Formatter<'_>, value: &Value) -> Result<()> {
    match value {
        Value::None => {}
        Value::Bool(b) => write!(f, "{b}")?,
        Value::Integer(n) => write!(f, "{n}")?,
        Value::Float(n) => write!(f, "{n}")?,
        Value::String(s) => f.write_str(s)?,
        Value::Bytes(b) => f.write_str(&String::from_utf8_lossy(b))?,
        Value::List(list) => {
            for (i, item) in list.iter().enumerate() {
                if i > 0 {
                    f.write_char(';')?;
                }
                format(f, item)?;
            }
        }
        Value::Object(obj) => match obj.to_text() {
            Some(text) => f.write_str(&text)?,
            None => return Err(err_unformattable(value)),
        },
        value => return Err(err_unformattable(value)),
    }
    Ok(())
}

/// Formats a value to a string using the default formatter.
pub(crate) fn to_text(value: &Value) -> Result<String> {
    let mut s = String::new();
    format(&mut Formatter::with_string(&mut s), value)?;
    Ok(s)
}

fn err_unformattable(value: &Value) -> Error {
    Error::type_mismatch(format!(
        "sigil evaluated to unformattable type {}",
        value.human()
    ))
}
