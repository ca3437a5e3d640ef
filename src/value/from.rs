//! Conversions into [`Value`], used by `Context::set`, function returns and
//! the `value!` macro.

use std::sync::Arc;

use crate::value::{List, Map};
use crate::{Func, Object, Value};

/// A function returning `()` resolves to [`Value::None`].
impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! integer {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Integer(i64::from(n))
                }
            }
        )+
    };
}

integer!(i8, i16, i32, i64, u8, u16, u32);

/// Lengths and positions saturate at `i64::MAX`.
impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::String(String::from(c))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

/// Raw bytes are kept as [`Value::Bytes`] and spliced lossily as UTF-8.
///
/// A `Vec<u8>` converts to a list of integers like any other vector, use
/// a slice to get bytes.
impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<Func> for Value {
    fn from(f: Func) -> Self {
        Self::Func(f)
    }
}

impl From<Arc<dyn Object>> for Value {
    fn from(obj: Arc<dyn Object>) -> Self {
        Self::Object(obj)
    }
}

/// `None` becomes [`Value::None`], anything else is converted as is.
impl<V> From<Option<V>> for Value
where
    V: Into<Value>,
{
    fn from(opt: Option<V>) -> Self {
        opt.map_or(Self::None, Into::into)
    }
}

impl<V> From<Vec<V>> for Value
where
    V: Into<Value>,
{
    fn from(items: Vec<V>) -> Self {
        items.into_iter().collect()
    }
}

impl<V, const N: usize> From<[V; N]> for Value
where
    V: Into<Value>,
{
    fn from(items: [V; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<V> FromIterator<V> for Value
where
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self::List(iter.into_iter().map(Into::into).collect::<List<_>>())
    }
}

impl<K, V> From<Map<K, V>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(map: Map<K, V>) -> Self {
        Self::Map(entries(map))
    }
}

/// Pairs build a map, so `Value::from([("HOST", "localhost")])` is the
/// same as `value!({ HOST: "localhost" })`.
impl<K, V, const N: usize> From<[(K, V); N]> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::Map(entries(pairs))
    }
}

fn entries<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Map<String, Value>
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
