//! The layered environment that sigils are resolved against.

mod cache;
mod overlay;

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use tracing::debug;

use crate::context::cache::Cache;
pub use crate::context::overlay::Overlay;
use crate::{Error, Result, Value};

/// A stack of layers mapping uppercase keys to values.
///
/// Lookups start at the innermost layer and fall through to the base layer.
/// Resolved sigils are cached per context, the cache is dropped whenever a
/// layer is pushed or popped. Writing with [`set`][Context::set] does not
/// invalidate the cache, so a cached sigil keeps its value until the scope
/// changes.
///
/// Each thread or task should own its own context.
#[derive(Debug)]
pub struct Context {
    id: u64,
    layers: Vec<IndexMap<String, Value>>,
    cache: Cache,
}

/// Identifies a layer pushed with [`Context::push_layer`].
///
/// A handle is only accepted by the context that returned it.
#[derive(Debug)]
#[must_use = "the layer must be popped using `Context::pop_layer`"]
pub struct ScopeHandle {
    context: u64,
    depth: usize,
}

/// A guard that pops its layer, and any layer pushed after it, when
/// dropped.
///
/// This struct is created by [`Context::scope`].
#[derive(Debug)]
#[must_use = "the layer is popped as soon as the scope is dropped"]
pub struct Scope<'ctx> {
    ctx: &'ctx mut Context,
    depth: usize,
}

impl Default for Context {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Construct a new context whose base layer contains the builtin
    /// functions.
    pub fn new() -> Self {
        #[cfg(feature = "builtins")]
        let base = crate::function::builtins::all().clone();
        #[cfg(not(feature = "builtins"))]
        let base = IndexMap::new();
        Self::with_base(base)
    }

    /// Construct a new context with an empty base layer.
    pub fn empty() -> Self {
        Self::with_base(IndexMap::new())
    }

    fn with_base(base: IndexMap<String, Value>) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            layers: vec![base],
            cache: Cache::default(),
        }
    }

    /// Returns the number of layers pushed on top of the base layer.
    #[inline]
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Looks up a key, first exactly as given and then uppercased.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.lookup(key)
            .or_else(|| self.lookup(&key.to_uppercase()))
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        self.layers.iter().rev().find_map(|layer| layer.get(key))
    }

    /// Sets a key in the innermost layer.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let layer = self.layers.len() - 1;
        self.layers[layer].insert(key.as_ref().to_uppercase(), value.into());
    }

    /// Sets a key in the base layer, visible once all layers are popped.
    pub fn set_base<K, V>(&mut self, key: K, value: V)
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.layers[0].insert(key.as_ref().to_uppercase(), value.into());
    }

    /// Pushes a new innermost layer.
    ///
    /// Any [`source`][Overlay::source] of the overlay is called now. The
    /// returned handle must be passed to [`pop_layer`][Context::pop_layer].
    pub fn push_layer(&mut self, overlay: impl Into<Overlay>) -> Result<ScopeHandle> {
        let layer = overlay.into().into_layer()?;
        debug!(depth = self.layers.len(), keys = layer.len(), "push context layer");
        self.layers.push(layer);
        self.cache.clear();
        Ok(ScopeHandle {
            context: self.id,
            depth: self.layers.len() - 1,
        })
    }

    /// Pops the innermost layer.
    ///
    /// Errors if the handle was returned by another context or does not
    /// belong to the innermost layer.
    pub fn pop_layer(&mut self, handle: ScopeHandle) -> Result<()> {
        if handle.context != self.id {
            return Err(Error::cache_inconsistency(format!(
                "cannot pop layer {} pushed onto another context",
                handle.depth
            )));
        }
        let innermost = self.layers.len() - 1;
        if handle.depth != innermost || innermost == 0 {
            return Err(Error::cache_inconsistency(format!(
                "cannot pop layer {} while layer {innermost} is innermost",
                handle.depth
            )));
        }
        self.truncate(handle.depth);
        Ok(())
    }

    /// Pushes a new innermost layer that is popped when the returned guard
    /// is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigils::{Context, Engine};
    ///
    /// let engine = Engine::new();
    /// let mut ctx = Context::new();
    /// {
    ///     let mut scope = ctx.scope([("USER", "admin")])?;
    ///     assert_eq!(engine.splice("[USER]", &mut scope).to_string()?, "admin");
    /// }
    /// assert!(ctx.get("USER").is_none());
    /// # Ok::<(), sigils::Error>(())
    /// ```
    pub fn scope(&mut self, overlay: impl Into<Overlay>) -> Result<Scope<'_>> {
        let ScopeHandle { depth, .. } = self.push_layer(overlay)?;
        Ok(Scope { ctx: self, depth })
    }

    /// Drops all cached values without changing any layer.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn truncate(&mut self, depth: usize) {
        debug!(depth, cached = self.cache.len(), "pop context layer");
        self.layers.truncate(depth);
        self.cache.clear();
    }

    pub(crate) fn cached(&self, sigil: &str) -> Option<Value> {
        self.cache.get(sigil).cloned()
    }

    pub(crate) fn cache(&mut self, sigil: &str, value: &Value) {
        self.cache.insert(sigil, value.clone());
    }
}

impl Deref for Scope<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.ctx
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.ctx
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        if self.ctx.layers.len() > self.depth {
            self.ctx.truncate(self.depth);
        }
    }
}
