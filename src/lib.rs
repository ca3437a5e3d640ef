//! Find, parse and resolve bracketed sigils embedded in text.
//!
//! A sigil is a dotted chain of names written between delimiters, such as
//! `[ENV.HOST]` or `[USERS=[ID].NAME.UPPER]`. Each node may carry an
//! argument, which is a quoted string, an integer, a boolean, a null, a bare
//! identifier or another sigil.
//!
//! # Features
//!
//! - Balanced extraction of the top level sigils in any text
//! - Resolution against a layered [`Context`] with scoped overlays
//! - Functions, domain objects and record lookups through [`Func`],
//!   [`Object`] and [`Manager`]
//! - Nested resolution, a value that contains sigils is spliced again
//! - Configurable delimiters: `[[ ENV.HOST ]]`
//! - Splice to a [`String`] or any [`std::io::Write`] implementor
//! - Build contexts using any [`serde`] serializable values
//!
//! # Getting started
//!
//! Your entry point is the [`Engine`] struct. The engine stores the syntax
//! config and the default splice settings. Generally, you only need to
//! construct one engine during the lifetime of a program, it can be shared
//! between threads.
//!
//! ```
//! let engine = sigils::Engine::new();
//! ```
//!
//! Values are stored in a [`Context`], each thread owns its own.
//!
//! ```
//! # let engine = sigils::Engine::new();
//! let mut ctx = sigils::Context::new();
//! ctx.set("ENV", sigils::value!({ HOST: "localhost" }));
//!
//! let result = engine.splice("http://[ENV.HOST]/", &mut ctx).to_string()?;
//! assert_eq!(result, "http://localhost/");
//! # Ok::<(), sigils::Error>(())
//! ```
//!
//! # Examples
//!
//! ### Scoped values
//!
//! A layer pushed onto the context shadows the outer layers until it is
//! popped.
//!
//! ```
//! use sigils::{value, Context, Engine};
//!
//! let engine = Engine::new();
//! let mut ctx = Context::new();
//! ctx.set("ENV", value!({ PROD: "db.example.com", TEST: "localhost" }));
//! ctx.set("SRC", "TEST");
//!
//! {
//!     let mut scope = ctx.scope([("SRC", "PROD")])?;
//!     let result = engine.splice("[ENV=[SRC]]", &mut scope).to_string()?;
//!     assert_eq!(result, "db.example.com");
//! }
//!
//! let result = engine.splice("[ENV=[SRC]]", &mut ctx).to_string()?;
//! assert_eq!(result, "localhost");
//! # Ok::<(), sigils::Error>(())
//! ```
//!
//! ### Structured data
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Server { ssh_hostname: String }
//!
//! let server = Server { ssh_hostname: "web1".into() };
//!
//! let mut ctx = sigils::Context::new();
//! ctx.set("ENV", sigils::to_value(&server)?);
//!
//! let result = sigils::Engine::new()
//!     .splice("ssh [ENV.SSH_HOSTNAME]", &mut ctx)
//!     .to_string()?;
//! assert_eq!(result, "ssh web1");
//! # Ok::<(), sigils::Error>(())
//! ```
//!
//! ### Custom syntax
//!
//! ```
//! let syntax = sigils::Syntax::builder().delims("[[", "]]").build();
//! let engine = sigils::Engine::with_syntax(syntax);
//!
//! let mut ctx = sigils::Context::new();
//! ctx.set("NAME", "world");
//!
//! let result = engine.splice("Hello [[NAME.UPPER]] [x]", &mut ctx).to_string()?;
//! assert_eq!(result, "Hello WORLD [x]");
//! # Ok::<(), sigils::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod compile;
mod context;
mod error;
mod function;
mod macros;
mod render;
mod types;
mod value;

use std::fmt;
use std::ops::Range;

pub use crate::context::{Context, Overlay, Scope, ScopeHandle};
pub use crate::error::{Error, ErrorKind};
pub use crate::function::{FuncArg, FuncArgs, FuncReturn, Function};
pub use crate::render::fmt::{format, Formatter};
pub use crate::render::{OnError, Splicer};
pub use crate::types::syntax::{Syntax, SyntaxBuilder};
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use crate::value::to_value;
pub use crate::value::{Func, List, Manager, Map, Object, Value};

use crate::types::ast;

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A formatter function or closure.
type FormatFn = dyn Fn(&mut Formatter<'_>, &Value) -> Result<()> + Sync + Send + 'static;

/// The extraction and resolution engine.
pub struct Engine<'engine> {
    syntax: Syntax<'engine>,
    default_formatter: &'engine FormatFn,
    max_depth: usize,
    on_error: OnError,
    cache: bool,
}

/// A parsed sigil.
///
/// This struct is created by [`Engine::parse`].
#[derive(Clone)]
pub struct Sigil<'source> {
    source: &'source str,
    ast: ast::Sigil,
}

impl<'engine> Default for Engine<'engine> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'engine> Engine<'engine> {
    /// Construct a new engine.
    #[inline]
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    /// Construct a new engine with custom syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigils::{Engine, Syntax};
    ///
    /// let syntax = Syntax::builder().delims("{{", "}}").build();
    /// let engine = Engine::with_syntax(syntax);
    /// ```
    #[inline]
    pub fn with_syntax(syntax: Syntax<'engine>) -> Self {
        Self {
            syntax,
            default_formatter: &format,
            max_depth: 6,
            on_error: OnError::Raise,
            cache: true,
        }
    }

    /// Set the default formatter, used to turn a resolved value into text.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::fmt::Write;
    /// use sigils::{Context, Engine, Formatter, Value};
    ///
    /// fn yes_no(f: &mut Formatter<'_>, value: &Value) -> sigils::Result<()> {
    ///     match value {
    ///         Value::Bool(b) => f.write_str(if *b { "yes" } else { "no" })?,
    ///         value => sigils::format(f, value)?,
    ///     }
    ///     Ok(())
    /// }
    ///
    /// let mut engine = Engine::new();
    /// engine.set_default_formatter(&yes_no);
    ///
    /// let mut ctx = Context::new();
    /// ctx.set("ENABLED", true);
    /// assert_eq!(engine.splice("[ENABLED]", &mut ctx).to_string()?, "yes");
    /// # Ok::<(), sigils::Error>(())
    /// ```
    #[inline]
    pub fn set_default_formatter<F>(&mut self, f: &'engine F)
    where
        F: Fn(&mut Formatter<'_>, &Value) -> Result<()> + Sync + Send + 'static,
    {
        self.default_formatter = f;
    }

    /// Set how many times a resolved value is spliced again if it contains
    /// sigils itself.
    ///
    /// Defaults to 6.
    #[inline]
    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }

    /// Set the policy for sigils that cannot be resolved.
    ///
    /// Defaults to [`OnError::Raise`].
    #[inline]
    pub fn set_on_error(&mut self, on_error: OnError) {
        self.on_error = on_error;
    }

    /// Set whether resolved sigils are cached in the context.
    ///
    /// Defaults to `true`.
    #[inline]
    pub fn set_cache(&mut self, cache: bool) {
        self.cache = cache;
    }

    /// Returns the syntax configuration.
    #[inline]
    pub fn syntax(&self) -> &Syntax<'engine> {
        &self.syntax
    }

    /// Returns the top level sigils in the text, in order of appearance.
    ///
    /// Duplicates are kept. Unbalanced delimiters and sigils with an
    /// unterminated quote are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// let engine = sigils::Engine::new();
    /// let sigils = engine.extract("[A.B] and [C=[D]] but not [E='x]");
    /// assert_eq!(sigils, ["[A.B]", "[C=[D]]"]);
    /// ```
    pub fn extract<'t>(&self, text: &'t str) -> Vec<&'t str> {
        compile::spans(&self.syntax, text)
            .into_iter()
            .map(|span| &text[span])
            .collect()
    }

    /// Returns the byte ranges of the top level sigils in the text.
    pub fn extract_spans(&self, text: &str) -> Vec<Range<usize>> {
        compile::spans(&self.syntax, text)
            .into_iter()
            .map(Range::from)
            .collect()
    }

    /// Parse a single sigil, including its delimiters.
    #[inline]
    pub fn parse<'source>(&self, source: &'source str) -> Result<Sigil<'source>> {
        let ast = compile::sigil(&self.syntax, source)?;
        Ok(Sigil { source, ast })
    }

    /// Parse and resolve a single sigil to its raw value.
    ///
    /// No formatting, caching or nested splicing is applied and every error
    /// is returned regardless of the [`OnError`] policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigils::{value, Context, Engine, Value};
    ///
    /// let mut ctx = Context::new();
    /// ctx.set("A", value!({ B: [1, 2, 3] }));
    ///
    /// let value = Engine::new().resolve("[A.B=-1]", &ctx)?;
    /// assert_eq!(value, Value::from(3));
    /// # Ok::<(), sigils::Error>(())
    /// ```
    #[inline]
    pub fn resolve(&self, sigil: &str, ctx: &Context) -> Result<Value> {
        self.parse(sigil)?.resolve(ctx)
    }

    /// Replace every sigil in the text with its resolved value.
    ///
    /// Returns a [`Splicer`] that can be configured and then written to a
    /// string or a writer.
    #[inline]
    pub fn splice<'s>(&'s self, text: &'s str, ctx: &'s mut Context) -> Splicer<'s> {
        Splicer::new(self, text, ctx)
    }

    /// Replace every sigil in the text with `pattern` without resolving
    /// anything, returning the new text and the removed sigils in order.
    ///
    /// # Examples
    ///
    /// ```
    /// let engine = sigils::Engine::new();
    /// let (sql, params) = engine.vanish("SELECT * FROM t WHERE a = [A] AND b = [B]", "?");
    /// assert_eq!(sql, "SELECT * FROM t WHERE a = ? AND b = ?");
    /// assert_eq!(params, ["[A]", "[B]"]);
    /// ```
    pub fn vanish(&self, text: &str, pattern: &str) -> (String, Vec<String>) {
        let mut out = String::with_capacity(text.len());
        let mut sigils = Vec::new();
        let mut cursor = 0;
        for span in compile::spans(&self.syntax, text) {
            out.push_str(&text[cursor..span.m]);
            out.push_str(pattern);
            sigils.push(text[span].to_owned());
            cursor = span.n;
        }
        out.push_str(&text[cursor..]);
        (out, sigils)
    }

    /// Replace each occurrence of `pattern` with the next sigil, undoing
    /// [`vanish`][Engine::vanish].
    ///
    /// Occurrences beyond the number of sigils are kept.
    pub fn unvanish<S>(&self, text: &str, sigils: &[S], pattern: &str) -> String
    where
        S: AsRef<str>,
    {
        if pattern.is_empty() {
            return text.to_owned();
        }
        let mut out = String::with_capacity(text.len());
        let mut sigils = sigils.iter();
        let mut rest = text;
        while let Some(i) = rest.find(pattern) {
            let Some(sigil) = sigils.next() else {
                break;
            };
            out.push_str(&rest[..i]);
            out.push_str(sigil.as_ref());
            rest = &rest[i + pattern.len()..];
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("syntax", &self.syntax)
            .field("max_depth", &self.max_depth)
            .field("on_error", &self.on_error)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<'source> Sigil<'source> {
    /// Returns the original sigil source.
    #[inline]
    pub fn source(&self) -> &'source str {
        self.source
    }

    /// Returns the names of the top level nodes, e.g. `["ENV", "HOST"]` for
    /// `[ENV.HOST]`.
    pub fn names(&self) -> Vec<&'source str> {
        self.ast
            .nodes
            .iter()
            .map(|node| &self.source[node.name.span])
            .collect()
    }

    /// Resolves this sigil to its raw value.
    #[inline]
    pub fn resolve(&self, ctx: &Context) -> Result<Value> {
        render::resolve::sigil(ctx, self.source, &self.ast)
    }
}

impl fmt::Debug for Sigil<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sigil")
            .field("source", &self.source)
            .field("names", &self.names())
            .finish()
    }
}
