use std::fmt;

use indexmap::IndexMap;

use crate::value::Map;
use crate::{Error, Result, Value};

/// The entries of a layer pushed onto a [`Context`][crate::Context].
///
/// Parts are applied in the order they were added, so a later part shadows
/// an earlier one. All top level keys are uppercased.
///
/// # Examples
///
/// ```
/// use sigils::{value, Context, Overlay};
///
/// let overlay = Overlay::new()
///     .merge(value!({ ENV: { HOST: "localhost" } }))
///     .set("user", "admin")
///     .source(|| Ok(value!({ SRC: "PROD" })));
///
/// let mut ctx = Context::empty();
/// let scope = ctx.scope(overlay)?;
/// assert_eq!(scope.get("USER"), Some(&value!("admin")));
/// # Ok::<(), sigils::Error>(())
/// ```
#[derive(Default)]
pub struct Overlay {
    parts: Vec<Part>,
}

type SourceFn = dyn FnOnce() -> Result<Value> + Send + 'static;

enum Part {
    Set(String, Value),
    Merge(Result<Value>),
    Source(Box<SourceFn>),
}

impl Overlay {
    /// Construct an empty overlay.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single entry.
    pub fn set<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.parts.push(Part::Set(key.into(), value.into()));
        self
    }

    /// Adds all entries of a map.
    ///
    /// Pushing the overlay fails if the value is not a [`Value::Map`].
    pub fn merge<V>(mut self, map: V) -> Self
    where
        V: Into<Value>,
    {
        self.parts.push(Part::Merge(Ok(map.into())));
        self
    }

    /// Adds all fields of any serializable data, e.g. a struct or a map
    /// loaded from a file.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn merge_serde<S>(mut self, data: S) -> Self
    where
        S: serde::Serialize,
    {
        self.parts.push(Part::Merge(crate::to_value(data)));
        self
    }

    /// Adds the entries of the map returned by `f`.
    ///
    /// The function is only called when the overlay is pushed.
    pub fn source<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Result<Value> + Send + 'static,
    {
        self.parts.push(Part::Source(Box::new(f)));
        self
    }

    /// Builds the layer, calling any sources.
    pub(crate) fn into_layer(self) -> Result<IndexMap<String, Value>> {
        let mut layer = IndexMap::new();
        for part in self.parts {
            match part {
                Part::Set(key, value) => {
                    layer.insert(key.to_uppercase(), value);
                }
                Part::Merge(map) => extend(&mut layer, map?)?,
                Part::Source(f) => extend(&mut layer, f()?)?,
            }
        }
        Ok(layer)
    }
}

fn extend(layer: &mut IndexMap<String, Value>, value: Value) -> Result<()> {
    match value {
        Value::Map(map) => {
            layer.extend(map.into_iter().map(|(k, v)| (k.to_uppercase(), v)));
            Ok(())
        }
        value => Err(Error::type_mismatch(format!(
            "context overlay must be a map, found {}",
            value.human()
        ))),
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("parts", &self.parts.len())
            .finish()
    }
}

impl From<Map<String, Value>> for Overlay {
    fn from(map: Map<String, Value>) -> Self {
        Self::new().merge(Value::Map(map))
    }
}

impl From<Value> for Overlay {
    fn from(value: Value) -> Self {
        Self::new().merge(value)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Overlay
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |overlay, (k, v)| overlay.set(k, v))
    }
}
