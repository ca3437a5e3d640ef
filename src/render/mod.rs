#![allow(clippy::wrong_self_convention)]

mod core;
pub(crate) mod fmt;
pub(crate) mod resolve;
pub(crate) mod value;

use std::io;

use crate::render::core::SplicerImpl;
use crate::render::fmt::{Formatter, Writer};
use crate::{Context, Engine, Error, Result};

/// What to do when a sigil cannot be resolved.
///
/// The policy applies to resolution misses only, see
/// [`Error::is_resolution_miss`]. Parse errors and misuse of the context
/// are always returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnError {
    /// Return the error.
    Raise,
    /// Leave the sigil in the output as written.
    Ignore,
    /// Replace the sigil with nothing.
    Remove,
    /// Replace the sigil with the given text.
    Default(String),
}

impl Default for OnError {
    #[inline]
    fn default() -> Self {
        Self::Raise
    }
}

/// Replaces the sigils in a text with their resolved values.
///
/// This struct is created by [`Engine::splice`]. The settings default to
/// those of the engine.
///
/// # Examples
///
/// ```
/// use sigils::{value, Context, Engine, OnError};
///
/// let engine = Engine::new();
/// let mut ctx = Context::new();
/// ctx.set("ENV", value!({ HOST: "localhost" }));
///
/// let result = engine
///     .splice("http://[ENV.HOST]:[ENV.PORT]/", &mut ctx)
///     .with_on_error(OnError::Default("80".into()))
///     .to_string()?;
/// assert_eq!(result, "http://localhost:80/");
/// # Ok::<(), sigils::Error>(())
/// ```
#[must_use = "must call `.to_string()` or `.to_writer(..)` on the splicer"]
pub struct Splicer<'s> {
    engine: &'s Engine<'s>,
    ctx: &'s mut Context,
    text: &'s str,
    max_depth: Option<usize>,
    on_error: Option<OnError>,
    cache: Option<bool>,
}

pub(crate) struct SpliceSettings {
    pub max_depth: usize,
    pub on_error: OnError,
    pub cache: bool,
}

impl<'s> Splicer<'s> {
    pub(crate) fn new(engine: &'s Engine<'s>, text: &'s str, ctx: &'s mut Context) -> Self {
        Self {
            engine,
            ctx,
            text,
            max_depth: None,
            on_error: None,
            cache: None,
        }
    }

    /// Set how many times a resolved value is spliced again if it contains
    /// sigils itself. Zero disables nested splicing.
    ///
    /// Defaults to the engine setting.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set the policy for sigils that cannot be resolved.
    ///
    /// Defaults to the engine setting.
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = Some(on_error);
        self
    }

    /// Set whether resolved sigils are cached in the context.
    ///
    /// Defaults to the engine setting.
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Splice the text to a string.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn to_string(self) -> Result<String> {
        let settings = self.settings();
        let mut s = String::with_capacity(self.text.len());
        let mut f = Formatter::with_string(&mut s);
        SplicerImpl {
            engine: self.engine,
            settings: &settings,
        }
        .splice(&mut f, self.ctx, self.text, settings.max_depth)?;
        Ok(s)
    }

    /// Splice the text to the given writer.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn to_writer<W>(self, writer: W) -> Result<()>
    where
        W: io::Write,
    {
        let settings = self.settings();
        let mut w = Writer::new(writer);
        let mut f = Formatter::with_writer(&mut w);
        SplicerImpl {
            engine: self.engine,
            settings: &settings,
        }
        .splice(&mut f, self.ctx, self.text, settings.max_depth)
        .map_err(|err| w.take_err().map(Error::from).unwrap_or(err))
    }

    fn settings(&self) -> SpliceSettings {
        SpliceSettings {
            max_depth: self.max_depth.unwrap_or(self.engine.max_depth),
            on_error: self
                .on_error
                .clone()
                .unwrap_or_else(|| self.engine.on_error.clone()),
            cache: self.cache.unwrap_or(self.engine.cache),
        }
    }
}

impl std::fmt::Debug for Splicer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Splicer")
            .field("text", &self.text)
            .field("max_depth", &self.max_depth)
            .field("on_error", &self.on_error)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
