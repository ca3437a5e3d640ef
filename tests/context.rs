use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sigils::{value, Context, Engine, ErrorKind, Overlay, Value};

#[test]
fn context_cache_hides_mutation_within_layer() -> sigils::Result<()> {
    let engine = Engine::new();
    let mut ctx = Context::new();
    ctx.set("X", 1);
    {
        let mut scope = ctx.scope(Overlay::new())?;
        assert_eq!(engine.splice("[X]", &mut scope).to_string()?, "1");
        scope.set_base("X", 2);
        assert_eq!(engine.splice("[X]", &mut scope).to_string()?, "1");
        assert_eq!(
            engine.splice("[X]", &mut scope).with_cache(false).to_string()?,
            "2"
        );
    }
    assert_eq!(engine.splice("[X]", &mut ctx).to_string()?, "2");
    Ok(())
}

#[test]
fn context_pop_and_push_reveals_mutation() -> sigils::Result<()> {
    let engine = Engine::new();
    let mut ctx = Context::new();
    ctx.set("X", "a");
    assert_eq!(engine.splice("[X]", &mut ctx).to_string()?, "a");
    ctx.set("X", "b");
    assert_eq!(engine.splice("[X]", &mut ctx).to_string()?, "a");

    let handle = ctx.push_layer(Overlay::new())?;
    assert_eq!(engine.splice("[X]", &mut ctx).to_string()?, "b");
    ctx.pop_layer(handle)?;
    assert_eq!(engine.splice("[X]", &mut ctx).to_string()?, "b");
    Ok(())
}

#[test]
fn context_clear_cache() -> sigils::Result<()> {
    let engine = Engine::new();
    let mut ctx = Context::new();
    ctx.set("X", 1);
    assert_eq!(engine.splice("[X]", &mut ctx).to_string()?, "1");
    ctx.set("X", 2);
    ctx.clear_cache();
    assert_eq!(engine.splice("[X]", &mut ctx).to_string()?, "2");
    Ok(())
}

#[test]
fn context_engine_cache_disabled() -> sigils::Result<()> {
    let mut engine = Engine::new();
    engine.set_cache(false);
    let mut ctx = Context::new();
    ctx.set("X", 1);
    assert_eq!(engine.splice("[X]", &mut ctx).to_string()?, "1");
    ctx.set("X", 2);
    assert_eq!(engine.splice("[X]", &mut ctx).to_string()?, "2");
    Ok(())
}

#[test]
fn context_scope_shadows_and_restores() -> sigils::Result<()> {
    let engine = Engine::new();
    let mut ctx = Context::new();
    ctx.set("ENV", value!({ PROD: "db.example.com", TEST: "localhost" }));
    ctx.set("SRC", "TEST");
    {
        let mut scope = ctx.scope([("SRC", "PROD")])?;
        assert_eq!(scope.depth(), 1);
        assert_eq!(
            engine.splice("[ENV=[SRC]]", &mut scope).to_string()?,
            "db.example.com"
        );
    }
    assert_eq!(ctx.depth(), 0);
    assert_eq!(engine.splice("[ENV=[SRC]]", &mut ctx).to_string()?, "localhost");
    Ok(())
}

#[test]
fn context_nested_scopes() -> sigils::Result<()> {
    let mut ctx = Context::empty();
    ctx.set("A", 0);
    let mut outer = ctx.scope([("A", 1)])?;
    {
        let inner = outer.scope([("B", 2)])?;
        assert_eq!(inner.get("A"), Some(&Value::from(1)));
        assert_eq!(inner.get("B"), Some(&Value::from(2)));
        assert_eq!(inner.depth(), 2);
    }
    assert_eq!(outer.get("B"), None);
    drop(outer);
    assert_eq!(ctx.get("A"), Some(&Value::from(0)));
    Ok(())
}

#[test]
fn context_pop_wrong_handle() -> sigils::Result<()> {
    let mut ctx = Context::empty();
    let outer = ctx.push_layer(Overlay::new())?;
    let inner = ctx.push_layer(Overlay::new())?;
    let err = ctx.pop_layer(outer).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CacheInconsistency);
    assert!(!err.is_resolution_miss());
    ctx.pop_layer(inner)?;
    Ok(())
}

#[test]
fn context_pop_handle_of_other_context() -> sigils::Result<()> {
    let engine = Engine::new();
    let mut request = Context::empty();
    let mut worker = Context::empty();
    let handle = request.push_layer([("USER", "alice")])?;
    let _worker_handle = worker.push_layer([("USER", "bob")])?;

    let err = worker.pop_layer(handle).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CacheInconsistency);
    assert_eq!(engine.splice("[USER]", &mut worker).to_string()?, "bob");
    assert_eq!(engine.splice("[USER]", &mut request).to_string()?, "alice");
    Ok(())
}

#[test]
fn context_overlay_source_is_lazy() -> sigils::Result<()> {
    let called = Arc::new(AtomicBool::new(false));
    let flag = called.clone();
    let overlay = Overlay::new().source(move || {
        flag.store(true, Ordering::SeqCst);
        Ok(value!({ SRC: "PROD" }))
    });
    assert!(!called.load(Ordering::SeqCst));

    let mut ctx = Context::new();
    let scope = ctx.scope(overlay)?;
    assert!(called.load(Ordering::SeqCst));
    assert_eq!(scope.get("SRC"), Some(&Value::from("PROD")));
    Ok(())
}

#[test]
fn context_overlay_keys_uppercased() -> sigils::Result<()> {
    let engine = Engine::new();
    let mut ctx = Context::empty();
    let mut scope = ctx.scope(
        Overlay::new()
            .set("user", "admin")
            .merge(value!({ env: { host: "localhost" } })),
    )?;
    assert_eq!(scope.get("USER"), Some(&Value::from("admin")));
    assert_eq!(scope.get("ENV"), Some(&value!({ host: "localhost" })));
    assert_eq!(engine.splice("[ENV.HOST]", &mut scope).to_string()?, "localhost");
    Ok(())
}

#[test]
fn context_overlay_non_map_fails() {
    let mut ctx = Context::empty();
    let err = ctx.push_layer(Overlay::new().merge(vec![1, 2])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(ctx.depth(), 0);
}

#[cfg(feature = "serde")]
#[test]
fn context_overlay_merge_serde() -> sigils::Result<()> {
    #[derive(serde::Serialize)]
    struct Settings {
        env: Env,
    }

    #[derive(serde::Serialize)]
    struct Env {
        ssh_hostname: &'static str,
        port: u16,
    }

    let settings = Settings {
        env: Env {
            ssh_hostname: "web1",
            port: 22,
        },
    };

    let engine = Engine::new();
    let mut ctx = Context::new();
    let mut scope = ctx.scope(Overlay::new().merge_serde(&settings))?;
    assert_eq!(
        engine
            .splice("ssh -p [ENV.PORT] [ENV.SSH_HOSTNAME]", &mut scope)
            .to_string()?,
        "ssh -p 22 web1"
    );
    Ok(())
}

#[test]
fn context_set_accepts_any_case() {
    let mut ctx = Context::empty();
    ctx.set("host", "x");
    assert_eq!(ctx.get("HOST"), Some(&Value::from("x")));
    assert_eq!(ctx.get("host"), Some(&Value::from("x")));
}
