use std::fmt::Write;

use indexmap::IndexMap;
use tracing::debug;

use crate::render::fmt::Formatter;
use crate::render::{resolve, OnError, SpliceSettings};
use crate::types::span::Span;
use crate::{compile, Context, Engine, Error, ErrorKind, Result, Value};

/// Replaces the sigils in a text with their resolved values.
pub(crate) struct SplicerImpl<'a> {
    pub engine: &'a Engine<'a>,
    pub settings: &'a SpliceSettings,
}

/// What to write in place of a sigil.
enum Fragment {
    Text(String),
    Literal,
}

impl SplicerImpl<'_> {
    /// Splices `text` into the formatter.
    ///
    /// Each distinct sigil is resolved once, in order of first appearance,
    /// and every occurrence is replaced in a single pass over the text. A
    /// resolved fragment is itself spliced while `depth` is not zero.
    pub(crate) fn splice(
        &self,
        f: &mut Formatter<'_>,
        ctx: &mut Context,
        text: &str,
        depth: usize,
    ) -> Result<()> {
        let spans = compile::spans(&self.engine.syntax, text);
        if spans.is_empty() {
            f.write_str(text)?;
            return Ok(());
        }
        debug!(count = spans.len(), depth, "found sigils");

        let mut fragments = IndexMap::new();
        for &span in &spans {
            let sigil = &text[span];
            if !fragments.contains_key(sigil) {
                let fragment = self.fragment(ctx, sigil, depth)?;
                fragments.insert(sigil, fragment);
            }
        }

        let mut cursor = 0;
        for span in spans {
            let Span { m, n } = span;
            f.write_str(&text[cursor..m])?;
            match &fragments[&text[span]] {
                Fragment::Text(s) => f.write_str(s)?,
                Fragment::Literal => f.write_str(&text[span])?,
            }
            cursor = n;
        }
        f.write_str(&text[cursor..])?;
        Ok(())
    }

    /// Resolves a single sigil and applies the error policy.
    fn fragment(&self, ctx: &mut Context, sigil: &str, depth: usize) -> Result<Fragment> {
        match self.resolve_to_text(ctx, sigil, depth) {
            Ok(text) => Ok(Fragment::Text(text)),
            Err(err) if err.is_resolution_miss() => {
                debug!(sigil, error = %err, policy = ?self.settings.on_error, "unresolved sigil");
                match &self.settings.on_error {
                    OnError::Raise => Err(err),
                    OnError::Ignore => Ok(Fragment::Literal),
                    OnError::Remove => Ok(Fragment::Text(String::new())),
                    OnError::Default(default) => Ok(Fragment::Text(default.clone())),
                }
            }
            Err(err) => Err(err),
        }
    }

    fn resolve_to_text(&self, ctx: &mut Context, sigil: &str, depth: usize) -> Result<String> {
        let value = self.resolve_cached(ctx, sigil)?;
        if value.is_none() {
            return Err(Error::with_kind(ErrorKind::NoneValue, "sigil resolved to none")
                .enrich(sigil, 0..sigil.len()));
        }

        let mut text = String::new();
        (self.engine.default_formatter)(&mut Formatter::with_string(&mut text), &value)
            .map_err(|err| err.enrich(sigil, 0..sigil.len()))?;

        if depth > 0 && compile::contains_sigil(&self.engine.syntax, &text) {
            let mut spliced = String::with_capacity(text.len());
            self.splice(
                &mut Formatter::with_string(&mut spliced),
                ctx,
                &text,
                depth - 1,
            )?;
            text = spliced;
        }
        Ok(text)
    }

    fn resolve_cached(&self, ctx: &mut Context, sigil: &str) -> Result<Value> {
        if self.settings.cache {
            if let Some(value) = ctx.cached(sigil) {
                debug!(sigil, "cache hit");
                return Ok(value);
            }
        }
        let ast = compile::sigil(&self.engine.syntax, sigil)?;
        let value = resolve::sigil(ctx, sigil, &ast)?;
        if self.settings.cache {
            ctx.cache(sigil, &value);
        }
        Ok(value)
    }
}
