use std::fmt;

use crate::{Result, Value};

/// A domain object that sigils can walk into.
///
/// Chained nodes look up fields by their lowercased name, so
/// `[HOST.SSH_HOSTNAME]` calls `get_field("ssh_hostname")`.
///
/// # Examples
///
/// ```
/// use sigils::{Object, Value};
///
/// #[derive(Debug)]
/// struct Host {
///     name: String,
/// }
///
/// impl Object for Host {
///     fn get_field(&self, name: &str) -> Option<Value> {
///         match name {
///             "name" => Some(Value::from(self.name.as_str())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Object: fmt::Debug + Send + Sync {
    /// Returns the value of the named field, if it exists.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Returns the record manager if this object gives access to a
    /// collection of records, e.g. a database model.
    fn manager(&self) -> Option<&dyn Manager> {
        None
    }

    /// Returns the text to substitute when the object itself is the final
    /// value of a sigil.
    fn to_text(&self) -> Option<String> {
        None
    }
}

/// Looks up records of a model.
///
/// A root node that names an object with a manager is resolved through it:
/// `[HOST='web1']` tries `get("pk", "web1")` and then
/// `get_by_natural_key("web1")`, while `[HOST.NAME='web1']` calls
/// `get("name", "web1")`.
pub trait Manager: Send + Sync {
    /// Returns the single record whose `field` equals `value`.
    fn get(&self, field: &str, value: &Value) -> Result<Option<Value>>;

    /// Returns the record identified by its natural key.
    fn get_by_natural_key(&self, key: &Value) -> Result<Option<Value>> {
        let _ = key;
        Ok(None)
    }
}
