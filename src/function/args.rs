use crate::function::FuncArg;
use crate::value::Map;
use crate::Value;

pub type Result<T> = std::result::Result<T, Error>;

pub enum Error {
    /// When there is a type mismatch.
    Type(
        /// Expected
        &'static str,
        /// Got
        &'static str,
    ),
}

impl Error {
    pub(super) fn into_error(self, index: usize) -> crate::Error {
        match self {
            Error::Type(exp, got) => crate::Error::type_mismatch(format!(
                "function argument {}: expected {exp}, found {got}",
                index + 1
            )),
        }
    }
}

impl FuncArg for Value {
    fn from_value(v: Value) -> Result<Self> {
        Ok(v)
    }
}

impl FuncArg for bool {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Bool(b) => Ok(b),
            v => Err(Error::Type("bool", v.human())),
        }
    }
}

impl FuncArg for i64 {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Integer(i) => Ok(i),
            v => Err(Error::Type("integer", v.human())),
        }
    }
}

impl FuncArg for f64 {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Float(f) => Ok(f),
            Value::Integer(i) => Ok(i as f64),
            v => Err(Error::Type("float", v.human())),
        }
    }
}

impl FuncArg for String {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::String(s) => Ok(s),
            Value::Bytes(b) => Ok(String::from_utf8_lossy(&b).into_owned()),
            v => Err(Error::Type("string", v.human())),
        }
    }
}

impl FuncArg for Vec<Value> {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::List(l) => Ok(l),
            v => Err(Error::Type("list", v.human())),
        }
    }
}

impl FuncArg for Map<String, Value> {
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::Map(m) => Ok(m),
            v => Err(Error::Type("map", v.human())),
        }
    }
}

impl<T> FuncArg for Option<T>
where
    T: FuncArg,
{
    fn from_value(v: Value) -> Result<Self> {
        match v {
            Value::None => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}
