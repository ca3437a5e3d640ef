use std::error::Error as _;

use sigils::{value, Context, Engine, Error, ErrorKind, Func, Value};

fn context(value: Value) -> Context {
    let Value::Map(map) = value else {
        panic!("context must be a map");
    };
    let mut ctx = Context::new();
    for (key, value) in map {
        ctx.set(key, value);
    }
    ctx
}

#[test]
fn resolve_map_field() {
    let ctx = context(value!({ ENV: { HOST: "localhost" } }));
    let value = Engine::new().resolve("[ENV.HOST]", &ctx).unwrap();
    assert_eq!(value, Value::from("localhost"));
}

#[test]
fn resolve_root_key_uppercased() {
    let ctx = context(value!({ ENV: { HOST: "localhost" } }));
    let value = Engine::new().resolve("[env.HOST]", &ctx).unwrap();
    assert_eq!(value, Value::from("localhost"));
}

#[test]
fn resolve_nested_sigil_argument() {
    let ctx = context(value!({ SRC: "PROD", ENV: { PROD: "localhost" } }));
    let value = Engine::new().resolve("[ENV=[SRC]]", &ctx).unwrap();
    assert_eq!(value, Value::from("localhost"));
}

#[test]
fn resolve_identifier_argument_is_looked_up() {
    let ctx = context(value!({ SRC: "PROD", ENV: { PROD: "localhost", SRC: "nope" } }));
    let value = Engine::new().resolve("[ENV=SRC]", &ctx).unwrap();
    assert_eq!(value, Value::from("localhost"));
}

#[test]
fn resolve_deeply_nested_arguments() {
    let ctx = context(value!({
        CURRENT: "alice",
        USR: { alice: { DEFAULT_ENV: "test" } },
        ENV: { test: { APP: "app.test" } },
    }));
    let value = Engine::new()
        .resolve("[ENV=[USR=[CURRENT].DEFAULT_ENV].APP]", &ctx)
        .unwrap();
    assert_eq!(value, Value::from("app.test"));
}

#[test]
fn resolve_list_index() {
    let engine = Engine::new();
    let ctx = context(value!({ L: ["a", "b", "c"] }));
    assert_eq!(engine.resolve("[L=0]", &ctx).unwrap(), Value::from("a"));
    assert_eq!(engine.resolve("[L=-1]", &ctx).unwrap(), Value::from("c"));
    assert_eq!(engine.resolve("[L.1]", &ctx).unwrap(), Value::from("b"));
    assert_eq!(engine.resolve("[L='2']", &ctx).unwrap(), Value::from("c"));
}

#[test]
fn resolve_list_index_out_of_range() {
    let ctx = context(value!({ L: ["a"] }));
    let err = Engine::new().resolve("[L=3]", &ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldNotFound);
    assert_eq!(err.to_string(), "`3` not found in list in sigil `[L=3]`");
}

#[test]
fn resolve_node_argument_indexes_found_value() {
    let ctx = context(value!({ A: { B: ["x", "y"] } }));
    let value = Engine::new().resolve("[A.B=1]", &ctx).unwrap();
    assert_eq!(value, Value::from("y"));
}

#[test]
fn resolve_raw_value() {
    let ctx = context(value!({ A: { B: [1, 2] } }));
    let value = Engine::new().resolve("[A.B]", &ctx).unwrap();
    assert_eq!(value, value!([1, 2]));
    let value = Engine::new().resolve("[A]", &ctx).unwrap();
    assert_eq!(value, value!({ B: [1, 2] }));
}

#[test]
fn resolve_lowercase_map_field() {
    let ctx = context(value!({ ENV: { ssh_hostname: "web1" } }));
    let value = Engine::new().resolve("[ENV.SSH_HOSTNAME]", &ctx).unwrap();
    assert_eq!(value, Value::from("web1"));
}

#[test]
fn resolve_root_function() {
    let mut ctx = Context::empty();
    ctx.set("ANSWER", Func::new(|| 42));
    ctx.set("GREET", Func::new(|name: String| format!("Hello {name}!")));
    let engine = Engine::new();
    assert_eq!(engine.resolve("[ANSWER]", &ctx).unwrap(), Value::from(42));
    assert_eq!(
        engine.resolve("[GREET='John']", &ctx).unwrap(),
        Value::from("Hello John!")
    );
}

#[test]
fn resolve_chained_context_function() {
    let mut ctx = Context::empty();
    ctx.set("PATH", "/usr/local/bin");
    ctx.set(
        "SEGMENT",
        Func::new(|path: String, n: i64| path.split('/').nth(n as usize).map(String::from)),
    );
    let value = Engine::new().resolve("[PATH.SEGMENT=2]", &ctx).unwrap();
    assert_eq!(value, Value::from("local"));
}

#[test]
fn resolve_function_found_by_item_access() {
    let mut ctx = Context::empty();
    ctx.set(
        "A",
        Value::from([("SHOUT", Func::new(|s: String| s.to_uppercase()))]),
    );
    let value = Engine::new().resolve("[A.SHOUT='hi']", &ctx).unwrap();
    assert_eq!(value, Value::from("HI"));
}

#[test]
fn resolve_item_before_field_before_function() {
    let mut ctx = Context::empty();
    ctx.set("LEN", Func::new(|_: Value| -1));
    ctx.set("A", value!({ LEN: 1, len: 2 }));
    ctx.set("B", value!({ len: 2 }));
    ctx.set("C", value!({ X: 0 }));
    let engine = Engine::new();
    assert_eq!(engine.resolve("[A.LEN]", &ctx).unwrap(), Value::from(1));
    assert_eq!(engine.resolve("[B.LEN]", &ctx).unwrap(), Value::from(2));
    assert_eq!(engine.resolve("[C.LEN]", &ctx).unwrap(), Value::from(-1));
}

#[test]
fn resolve_err_key_not_found() {
    let ctx = Context::empty();
    let err = Engine::new().resolve("[MISSING.X]", &ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    assert_eq!(
        err.to_string(),
        "`MISSING` not found in context in sigil `[MISSING.X]`"
    );
}

#[test]
fn resolve_err_field_not_found() {
    let ctx = context(value!({ A: { B: "C" } }));
    let err = Engine::new().resolve("[A.C]", &ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldNotFound);
    assert_eq!(
        format!("{err:#}"),
        "
   |
 1 | [A.C]
   |    ^ `C` not found in map
"
    );
}

#[test]
fn resolve_err_callable_keeps_cause() {
    let mut ctx = Context::empty();
    ctx.set("FAIL", Func::new(|| -> sigils::Result<Value> { Err(Error::new("boom")) }));
    let err = Engine::new().resolve("[FAIL]", &ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Callable);
    assert_eq!(
        err.to_string(),
        "function `FAIL` failed: boom in sigil `[FAIL]`"
    );
    assert_eq!(err.source().unwrap().to_string(), "boom");
}

#[test]
fn resolve_err_argument_type_mismatch() {
    let mut ctx = Context::empty();
    ctx.set("SHOUT", Func::new(|s: String| s.to_uppercase()));
    let err = Engine::new().resolve("[SHOUT=true]", &ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(
        err.to_string(),
        "function argument 1: expected string, found bool in sigil `[SHOUT=true]`"
    );
}

#[test]
fn resolve_err_parse_is_not_a_miss() {
    let err = Engine::new().resolve("[A.]", &Context::empty()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(!err.is_resolution_miss());
}

#[test]
fn resolve_none_is_returned_raw() {
    let ctx = context(value!({ A: None }));
    assert_eq!(Engine::new().resolve("[A]", &ctx).unwrap(), Value::None);
}

#[test]
fn resolve_sigil_reused() {
    let engine = Engine::new();
    let sigil = engine.parse("[X]").unwrap();
    let mut ctx = Context::empty();
    ctx.set("X", 1);
    assert_eq!(sigil.resolve(&ctx).unwrap(), Value::from(1));
    ctx.set("X", 2);
    assert_eq!(sigil.resolve(&ctx).unwrap(), Value::from(2));
}
