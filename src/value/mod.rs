//! Defines the [`Value`] enum, representing anything a sigil can resolve to.

mod from;
mod object;
#[cfg(feature = "serde")]
mod ser;

pub use std::collections::BTreeMap as Map;
use std::mem;
use std::sync::Arc;
pub use std::vec::Vec as List;

pub use crate::function::Func;
pub use crate::value::object::{Manager, Object};
#[cfg(feature = "serde")]
pub use crate::value::ser::to_value;

/// Data stored in a context and produced by resolving a sigil.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(List<Value>),
    Map(Map<String, Value>),
    /// A domain object with named fields and optionally a record manager.
    Object(Arc<dyn Object>),
    /// A callable registered in the context.
    Func(Func),
}

impl Value {
    /// Wraps a domain object.
    pub fn object<O>(obj: O) -> Self
    where
        O: Object + 'static,
    {
        Self::Object(Arc::new(obj))
    }

    /// Returns `true` if this is [`Value::None`].
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the string slice if this is a [`Value::String`].
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this value is considered true by `IF` and `NOT`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Bytes(b) => !b.is_empty(),
            Self::List(l) => !l.is_empty(),
            Self::Map(m) => !m.is_empty(),
            Self::Object(_) | Self::Func(_) => true,
        }
    }

    pub(crate) fn human(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
            Self::Func(_) => "function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(s), Self::Bool(o)) => s == o,
            (Self::Integer(s), Self::Integer(o)) => s == o,
            (Self::Float(s), Self::Float(o)) => s == o,
            (Self::String(s), Self::String(o)) => s == o,
            (Self::Bytes(s), Self::Bytes(o)) => s == o,
            (Self::List(s), Self::List(o)) => s == o,
            (Self::Map(s), Self::Map(o)) => s == o,
            (Self::Object(s), Self::Object(o)) => Arc::ptr_eq(s, o),
            (Self::Func(s), Self::Func(o)) => s.ptr_eq(o),
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}
