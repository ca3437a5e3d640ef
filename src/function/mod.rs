//! Callables stored in a context.
//!
//! Every callable is normalized to the same calling convention: it receives
//! a list of positional argument values and returns a [`Result<Value>`]. A
//! chained node calls the function with the current value and the node
//! argument, a root node calls it with just the node argument.

mod args;
#[cfg(feature = "builtins")]
pub(crate) mod builtins;

use std::fmt;
use std::sync::Arc;

use crate::{Error, Result, Value};

type FuncImpl = dyn Fn(Vec<Value>) -> Result<Value> + Send + Sync + 'static;

/// A function that can be stored in a context and invoked by a sigil.
///
/// # Examples
///
/// ```
/// use sigils::{Context, Engine, Func};
///
/// let engine = Engine::new();
/// let mut ctx = Context::empty();
/// ctx.set("GREET", Func::new(|name: String| format!("Hello {name}!")));
/// ctx.set("USER", "John");
///
/// let result = engine.splice("[USER.GREET]", &mut ctx).to_string()?;
/// assert_eq!(result, "Hello John!");
/// # Ok::<(), sigils::Error>(())
/// ```
#[derive(Clone)]
pub struct Func {
    arity: Option<usize>,
    imp: Arc<FuncImpl>,
}

impl Func {
    /// Wraps a function or closure taking zero, one or two arguments.
    ///
    /// Arguments are converted using [`FuncArg`], a conversion failure is
    /// reported as a [`TypeMismatch`][crate::ErrorKind::TypeMismatch]. If a
    /// sigil passes more arguments than the function takes, the surplus is
    /// dropped from the end. Missing arguments are passed as
    /// [`Value::None`], so use an [`Option`] argument to make one optional.
    pub fn new<F, R, A>(f: F) -> Self
    where
        F: Function<R, A> + Send + Sync + 'static,
        R: FuncReturn,
        A: FuncArgs,
    {
        Self {
            arity: Some(A::ARITY),
            imp: Arc::new(move |args: Vec<Value>| -> Result<Value> {
                let args = A::from_args(args)?;
                f.invoke(args).into_result()
            }),
        }
    }

    /// Wraps a function that receives all arguments as given.
    pub fn variadic<F, R>(f: F) -> Self
    where
        F: Fn(&[Value]) -> R + Send + Sync + 'static,
        R: FuncReturn,
    {
        Self {
            arity: None,
            imp: Arc::new(move |args: Vec<Value>| f(&args).into_result()),
        }
    }

    /// Returns the number of arguments the function takes, `None` if it is
    /// variadic.
    #[inline]
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Calls the function.
    pub fn call(&self, mut args: Vec<Value>) -> Result<Value> {
        if let Some(n) = self.arity {
            args.resize(n, Value::None);
        }
        (self.imp)(args)
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.imp, &other.imp)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Some(n) => write!(f, "<function/{n}>"),
            None => f.write_str("<function/*>"),
        }
    }
}

/// Represents any function that can be wrapped by [`Func::new`].
///
/// This is implemented for functions and closures taking up to two
/// arguments, where each argument implements [`FuncArg`] and the return
/// type implements [`FuncReturn`].
pub trait Function<R, A> {
    #[doc(hidden)]
    fn invoke(&self, args: A) -> R;
}

/// A tuple of arguments converted from the values passed by a sigil.
pub trait FuncArgs: Sized {
    #[doc(hidden)]
    const ARITY: usize;

    #[doc(hidden)]
    fn from_args(args: Vec<Value>) -> Result<Self>;
}

/// A single function argument.
///
/// Implemented for the following owned types.
/// - [`Value`]
/// - [`bool`]
/// - [`i64`]
/// - [`f64`] (integers are widened)
/// - [`String`]
/// - [`Vec<Value>`]
/// - [`BTreeMap<String, Value>`][std::collections::BTreeMap]
/// - [`Option<T>`] where `T` is one of the above, `None` when the argument
///   is missing or [`Value::None`]
pub trait FuncArg: Sized {
    #[doc(hidden)]
    fn from_value(v: Value) -> args::Result<Self>;
}

/// The return type of a function.
///
/// Implemented for `T` and `Result<T, Error>` where `T: Into<Value>`.
pub trait FuncReturn {
    #[doc(hidden)]
    fn into_result(self) -> Result<Value>;
}

////////////////////////////////////////////////////////////////////////////////
// Function
////////////////////////////////////////////////////////////////////////////////

impl<F, R> Function<R, ()> for F
where
    F: Fn() -> R,
{
    fn invoke(&self, (): ()) -> R {
        self()
    }
}

impl<F, R, V> Function<R, (V,)> for F
where
    F: Fn(V) -> R,
{
    fn invoke(&self, (v,): (V,)) -> R {
        self(v)
    }
}

impl<F, R, V, W> Function<R, (V, W)> for F
where
    F: Fn(V, W) -> R,
{
    fn invoke(&self, (v, w): (V, W)) -> R {
        self(v, w)
    }
}

////////////////////////////////////////////////////////////////////////////////
// FuncArgs
////////////////////////////////////////////////////////////////////////////////

impl FuncArgs for () {
    const ARITY: usize = 0;

    fn from_args(_: Vec<Value>) -> Result<Self> {
        Ok(())
    }
}

impl<V> FuncArgs for (V,)
where
    V: FuncArg,
{
    const ARITY: usize = 1;

    fn from_args(args: Vec<Value>) -> Result<Self> {
        let mut args = args.into_iter();
        let v = get_arg(&mut args, 0)?;
        Ok((v,))
    }
}

impl<V, W> FuncArgs for (V, W)
where
    V: FuncArg,
    W: FuncArg,
{
    const ARITY: usize = 2;

    fn from_args(args: Vec<Value>) -> Result<Self> {
        let mut args = args.into_iter();
        let v = get_arg(&mut args, 0)?;
        let w = get_arg(&mut args, 1)?;
        Ok((v, w))
    }
}

fn get_arg<T>(args: &mut impl Iterator<Item = Value>, i: usize) -> Result<T>
where
    T: FuncArg,
{
    let value = args.next().unwrap_or(Value::None);
    T::from_value(value).map_err(|e| e.into_error(i))
}

////////////////////////////////////////////////////////////////////////////////
// FuncReturn
////////////////////////////////////////////////////////////////////////////////

impl<T> FuncReturn for T
where
    T: Into<Value>,
{
    fn into_result(self) -> Result<Value> {
        Ok(self.into())
    }
}

impl<T> FuncReturn for std::result::Result<T, Error>
where
    T: Into<Value>,
{
    fn into_result(self) -> Result<Value> {
        self.map(Into::into)
    }
}
