//! Builtin functions and objects seeded into every new context.
//!
//! When used as a chained node the current value is the first argument, so
//! `[NAME.UPPER]` calls `UPPER(NAME)` and `[PATH.SPLIT='/']` calls
//! `SPLIT(PATH, '/')`.

use std::cmp::Ordering;
use std::env;
use std::process;
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::render::fmt::to_text;
use crate::render::value::{get_item, index};
use crate::{Error, Func, Object, Result, Value};

/// Returns the builtins, built once per process.
pub(crate) fn all() -> &'static IndexMap<String, Value> {
    static BUILTINS: OnceLock<IndexMap<String, Value>> = OnceLock::new();
    BUILTINS.get_or_init(|| {
        let mut m = IndexMap::new();
        let mut add = |name: &str, value: Value| {
            m.insert(String::from(name), value);
        };
        add("UPPER", Func::new(upper).into());
        add("LOWER", Func::new(lower).into());
        add("TRIM", Func::new(trim).into());
        add("JOIN", Func::new(join).into());
        add("SPLIT", Func::new(split).into());
        add("WORD", Func::new(word).into());
        add("ITEM", Func::new(item).into());
        add("LEN", Func::new(len).into());
        add("FIRST", Func::new(first).into());
        add("LAST", Func::new(last).into());
        add("REVERSE", Func::new(reverse).into());
        add("MASK", Func::new(mask).into());
        add("IF", Func::new(if_).into());
        add("NULL", Func::new(null).into());
        add("NOT", Func::new(not).into());
        add("ADD", Func::new(add_).into());
        add("SUB", Func::new(sub).into());
        add("MUL", Func::new(mul).into());
        add("DIV", Func::new(div).into());
        add("MOD", Func::new(mod_).into());
        add("EQ", Func::new(|a: Value, b: Value| eq(&a, &b)).into());
        add("NE", Func::new(|a: Value, b: Value| !eq(&a, &b)).into());
        add("LT", Func::new(|a: Value, b: Value| cmp(&a, &b).map(Ordering::is_lt)).into());
        add("LE", Func::new(|a: Value, b: Value| cmp(&a, &b).map(Ordering::is_le)).into());
        add("GT", Func::new(|a: Value, b: Value| cmp(&a, &b).map(Ordering::is_gt)).into());
        add("GE", Func::new(|a: Value, b: Value| cmp(&a, &b).map(Ordering::is_ge)).into());
        add("STR", Func::new(|v: Value| to_text(&v)).into());
        add("INT", Func::new(int).into());
        add("FLOAT", Func::new(float).into());
        add("SYS", Value::object(Sys));
        m
    })
}

fn upper(s: String) -> String {
    s.to_uppercase()
}

fn lower(s: String) -> String {
    s.to_lowercase()
}

fn trim(s: String) -> String {
    s.trim().to_owned()
}

/// Joins the formatted elements with the separator, `,` by default.
fn join(list: Vec<Value>, sep: Option<String>) -> Result<String> {
    let sep = sep.as_deref().unwrap_or(",");
    let parts = list.iter().map(to_text).collect::<Result<Vec<_>>>()?;
    Ok(parts.join(sep))
}

/// Splits on the separator, or on whitespace if there is none.
fn split(s: String, sep: Option<String>) -> Vec<String> {
    match sep {
        Some(sep) if !sep.is_empty() => s.split(sep.as_str()).map(String::from).collect(),
        _ => s.split_whitespace().map(String::from).collect(),
    }
}

/// Returns the n-th whitespace separated word.
fn word(s: String, n: i64) -> Option<String> {
    let words = s.split_whitespace().map(Value::from).collect();
    index(&words, n).and_then(Value::as_str).map(String::from)
}

fn item(value: Value, key: Value) -> Option<Value> {
    get_item(&value, &key)
}

fn len(value: Value) -> Result<i64> {
    let n = match &value {
        Value::String(s) => s.chars().count(),
        Value::Bytes(b) => b.len(),
        Value::List(l) => l.len(),
        Value::Map(m) => m.len(),
        value => return Err(err_unsupported("LEN", value)),
    };
    i64::try_from(n).map_err(|_| Error::type_mismatch("length does not fit in an integer"))
}

fn first(list: Vec<Value>) -> Option<Value> {
    list.into_iter().next()
}

fn last(list: Vec<Value>) -> Option<Value> {
    list.into_iter().last()
}

fn reverse(value: Value) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
        Value::List(list) => Ok(Value::List(list.into_iter().rev().collect())),
        value => Err(err_unsupported("REVERSE", &value)),
    }
}

/// Masks all but the last `keep` characters, 4 by default.
fn mask(s: String, keep: Option<i64>) -> String {
    let keep = usize::try_from(keep.unwrap_or(4)).unwrap_or(0);
    let n = s.chars().count();
    s.chars()
        .enumerate()
        .map(|(i, c)| if i + keep < n { '*' } else { c })
        .collect()
}

/// Returns `then` if the condition holds, otherwise an empty string.
fn if_(cond: Value, then: Value) -> Value {
    if cond.is_truthy() {
        then
    } else {
        Value::from("")
    }
}

/// Returns the fallback if the value is none or an empty string.
fn null(value: Value, fallback: Value) -> Value {
    match &value {
        Value::None => fallback,
        Value::String(s) if s.is_empty() => fallback,
        _ => value,
    }
}

fn not(value: Value) -> bool {
    !value.is_truthy()
}

enum Num {
    Int(i64),
    Float(f64),
}

fn num(name: &str, value: &Value) -> Result<Num> {
    match value {
        Value::Integer(i) => Ok(Num::Int(*i)),
        Value::Float(f) => Ok(Num::Float(*f)),
        Value::String(s) => {
            let s = s.trim();
            s.parse()
                .map(Num::Int)
                .or_else(|_| s.parse().map(Num::Float))
                .map_err(|_| err_unsupported(name, value))
        }
        value => Err(err_unsupported(name, value)),
    }
}

fn arith(
    name: &str,
    a: &Value,
    b: &Value,
    int: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> Result<Value> {
    match (num(name, a)?, num(name, b)?) {
        (Num::Int(a), Num::Int(b)) => int(a, b)
            .map(Value::Integer)
            .ok_or_else(|| Error::type_mismatch(format!("{name}: integer overflow"))),
        (a, b) => Ok(Value::Float(float(a.to_f64(), b.to_f64()))),
    }
}

impl Num {
    fn to_f64(&self) -> f64 {
        match *self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    fn is_zero(&self) -> bool {
        match *self {
            Num::Int(i) => i == 0,
            Num::Float(f) => f == 0.0,
        }
    }
}

/// Adds numbers, or concatenates two strings that are not numeric.
fn add_(a: Value, b: Value) -> Result<Value> {
    if let (Value::String(x), Value::String(y)) = (&a, &b) {
        if num("ADD", &a).is_err() || num("ADD", &b).is_err() {
            return Ok(Value::String(format!("{x}{y}")));
        }
    }
    arith("ADD", &a, &b, i64::checked_add, |x, y| x + y)
}

fn sub(a: Value, b: Value) -> Result<Value> {
    arith("SUB", &a, &b, i64::checked_sub, |x, y| x - y)
}

fn mul(a: Value, b: Value) -> Result<Value> {
    arith("MUL", &a, &b, i64::checked_mul, |x, y| x * y)
}

fn div(a: Value, b: Value) -> Result<Value> {
    if num("DIV", &b)?.is_zero() {
        return Err(Error::type_mismatch("DIV: division by zero"));
    }
    arith("DIV", &a, &b, i64::checked_div, |x, y| x / y)
}

fn mod_(a: Value, b: Value) -> Result<Value> {
    if num("MOD", &b)?.is_zero() {
        return Err(Error::type_mismatch("MOD: division by zero"));
    }
    arith("MOD", &a, &b, i64::checked_rem_euclid, f64::rem_euclid)
}

fn eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(x), Value::Float(y)) | (Value::Float(y), Value::Integer(x)) => {
            (*x as f64) == *y
        }
        _ => a == b,
    }
}

fn cmp(a: &Value, b: &Value) -> Result<Ordering> {
    let ord = match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            let x = num("compare", a)?.to_f64();
            let y = num("compare", b)?.to_f64();
            x.partial_cmp(&y)
        }
        _ => None,
    };
    ord.ok_or_else(|| {
        Error::type_mismatch(format!(
            "cannot compare {} with {}",
            a.human(),
            b.human()
        ))
    })
}

fn int(value: Value) -> Result<i64> {
    match &value {
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Float(f) => Ok(f.trunc() as i64),
        _ => match num("INT", &value)? {
            Num::Int(i) => Ok(i),
            Num::Float(f) => Ok(f.trunc() as i64),
        },
    }
}

fn float(value: Value) -> Result<f64> {
    Ok(num("FLOAT", &value)?.to_f64())
}

fn err_unsupported(name: &str, value: &Value) -> Error {
    Error::type_mismatch(format!("{name}: unsupported value {}", value.human()))
}

/// Process information, e.g. `[SYS.ENV.HOME]` or `[SYS.PID]`.
#[derive(Debug)]
struct Sys;

impl Object for Sys {
    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "env" => Some(Value::object(Env)),
            "pid" => Some(Value::from(process::id())),
            "cwd" => env::current_dir()
                .ok()
                .map(|p| Value::from(p.to_string_lossy().into_owned())),
            "os" => Some(Value::from(env::consts::OS)),
            _ => None,
        }
    }
}

/// Environment variables, looked up uppercased first so that
/// `[SYS.ENV.home]` finds `HOME`.
#[derive(Debug)]
struct Env;

impl Object for Env {
    fn get_field(&self, name: &str) -> Option<Value> {
        env::var_os(name.to_uppercase())
            .or_else(|| env::var_os(name))
            .map(|v| Value::from(v.to_string_lossy().into_owned()))
    }
}
