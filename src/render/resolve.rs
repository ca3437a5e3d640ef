//! Walks the nodes of a parsed sigil against a context.

use std::iter::Peekable;
use std::slice;

use tracing::trace;

use crate::render::fmt::to_text;
use crate::render::value::{get_field, get_item};
use crate::types::ast;
use crate::types::span::Span;
use crate::{Context, Error, Func, Manager, Result, Value};

type Nodes<'a> = Peekable<slice::Iter<'a, ast::Node>>;

/// Resolves a parsed sigil to its raw value.
///
/// The `source` is the text the sigil was parsed from, nested sigils share
/// the source of the outermost one.
pub fn sigil(ctx: &Context, source: &str, sigil: &ast::Sigil) -> Result<Value> {
    Resolver { ctx, source }.resolve(sigil)
}

struct Resolver<'a> {
    ctx: &'a Context,
    source: &'a str,
}

impl Resolver<'_> {
    fn resolve(&self, sigil: &ast::Sigil) -> Result<Value> {
        let mut nodes = sigil.nodes.iter().peekable();
        let mut current = match nodes.next() {
            Some(root) => self.resolve_root(root, &mut nodes)?,
            None => return Err(Error::parse("empty sigil", self.source, sigil.span)),
        };
        for node in nodes {
            current = self.resolve_node(current, node)?;
        }
        Ok(current)
    }

    /// Resolves the first node of a sigil which is always looked up in the
    /// context.
    ///
    /// A record manager may consume the following node, e.g. `[HOST.NAME='x']`
    /// becomes a single lookup by `name`.
    fn resolve_root(&self, root: &ast::Node, rest: &mut Nodes<'_>) -> Result<Value> {
        let name = &self.source[root.name.span];
        let arg = self.resolve_arg(root.arg.as_ref())?;

        let value = self.ctx.get(name).ok_or_else(|| {
            Error::key_not_found(format!("`{name}` not found in context"))
                .enrich(self.source, root.name.span)
        })?;
        trace!(name, kind = value.human(), "resolved root node");

        if let Value::Object(obj) = value {
            if let Some(manager) = obj.manager() {
                return match arg {
                    Some(key) => self.lookup_record(name, manager, &key, root.span),
                    None => match rest.next_if(|next| next.arg.is_some()) {
                        Some(next) => self.lookup_record_by(name, manager, root, next),
                        None => Ok(value.clone()),
                    },
                };
            }
        }

        match (value, arg) {
            (Value::Func(f), arg) => self.call(name, f, arg.into_iter().collect(), root.span),
            (value, Some(key)) => self.item(value, &key, root.span),
            (value, None) => Ok(value.clone()),
        }
    }

    /// Resolves a chained node against the current value.
    ///
    /// Tries in order: item access by the exact name, field access by the
    /// lowercased name and a context function called with the current value.
    fn resolve_node(&self, current: Value, node: &ast::Node) -> Result<Value> {
        let name = &self.source[node.name.span];
        let arg = self.resolve_arg(node.arg.as_ref())?;

        let found = match get_item(&current, &Value::from(name)) {
            Some(value) => {
                trace!(name, "item access");
                Some(value)
            }
            None => {
                let value = get_field(&current, &name.to_lowercase());
                if value.is_some() {
                    trace!(name, "field access");
                }
                value
            }
        };

        let result = match found {
            Some(Value::Func(f)) => Value::Func(f),
            Some(value) => match &arg {
                Some(key) => self.item(&value, key, node.span)?,
                None => value,
            },
            None => match self.ctx.get(name) {
                Some(Value::Func(f)) => {
                    trace!(name, "context function");
                    let mut args = vec![current];
                    args.extend(arg.clone());
                    self.call(name, f, args, node.span)?
                }
                _ => {
                    return Err(Error::field_not_found(format!(
                        "`{name}` not found in {}",
                        current.human()
                    ))
                    .enrich(self.source, node.name.span));
                }
            },
        };

        match result {
            Value::Func(f) => self.call(name, &f, arg.into_iter().collect(), node.span),
            value => Ok(value),
        }
    }

    /// Evaluates a node argument.
    ///
    /// A bare identifier is resolved like the sigil `[IDENT]`.
    fn resolve_arg(&self, arg: Option<&ast::Arg>) -> Result<Option<Value>> {
        let value = match arg {
            None => return Ok(None),
            Some(ast::Arg::Literal(lit)) => lit.value.clone(),
            Some(ast::Arg::Sigil(sigil)) => self.resolve(sigil)?,
            Some(ast::Arg::Var(ident)) => {
                let node = ast::Node {
                    name: *ident,
                    arg: None,
                    span: ident.span,
                };
                self.resolve_root(&node, &mut [].iter().peekable())?
            }
        };
        Ok(Some(value))
    }

    /// Looks up a record by the field named by `next`, e.g. `NAME` in
    /// `[HOST.NAME='web1']`.
    fn lookup_record_by(
        &self,
        name: &str,
        manager: &dyn Manager,
        root: &ast::Node,
        next: &ast::Node,
    ) -> Result<Value> {
        let field = self.source[next.name.span].to_lowercase();
        let key = self.resolve_arg(next.arg.as_ref())?.unwrap_or(Value::None);
        let span = root.span.combine(next.span);
        trace!(name, field = %field, "record lookup by field");
        manager
            .get(&field, &key)
            .map_err(|e| self.err_callable(name, e, span))?
            .ok_or_else(|| {
                Error::key_not_found(format!(
                    "no `{name}` record with {field} {}",
                    describe(&key)
                ))
                .enrich(self.source, span)
            })
    }

    fn lookup_record(
        &self,
        name: &str,
        manager: &dyn Manager,
        key: &Value,
        span: Span,
    ) -> Result<Value> {
        let err = |e| self.err_callable(name, e, span);
        if let Some(record) = manager.get("pk", key).map_err(err)? {
            trace!(name, "record lookup by primary key");
            return Ok(record);
        }
        if let Some(record) = manager.get_by_natural_key(key).map_err(err)? {
            trace!(name, "record lookup by natural key");
            return Ok(record);
        }
        Err(
            Error::key_not_found(format!("no `{name}` record found for {}", describe(key)))
                .enrich(self.source, span),
        )
    }

    fn item(&self, value: &Value, key: &Value, span: Span) -> Result<Value> {
        get_item(value, key).ok_or_else(|| {
            Error::field_not_found(format!(
                "{} not found in {}",
                describe(key),
                value.human()
            ))
            .enrich(self.source, span)
        })
    }

    fn call(&self, name: &str, f: &Func, args: Vec<Value>, span: Span) -> Result<Value> {
        trace!(name, args = args.len(), "call function");
        f.call(args).map_err(|e| self.err_callable(name, e, span))
    }

    fn err_callable(&self, name: &str, err: Error, span: Span) -> Error {
        Error::callable(name, err).enrich(self.source, span)
    }
}

/// Describes a key for an error message.
fn describe(key: &Value) -> String {
    match to_text(key) {
        Ok(text) => format!("`{text}`"),
        Err(_) => key.human().to_owned(),
    }
}
