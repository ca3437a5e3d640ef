#![cfg(feature = "builtins")]

use sigils::{value, Context, Engine, ErrorKind, OnError};

fn splice(text: &str) -> sigils::Result<String> {
    let mut ctx = Context::new();
    ctx.set(
        "DATA",
        value!({
            NAME: "  Jane Doe ",
            PATH: "/usr/local/bin",
            TAGS: ["a", "b", "c"],
            COUNT: 7,
            RATIO: 0.5,
            EMPTY: "",
            OFF: false,
            TOKEN: "sk-1234567890",
        }),
    );
    Engine::new().splice(text, &mut ctx).to_string()
}

#[test]
fn builtins_case_and_trim() {
    assert_eq!(
        splice("[DATA.NAME.TRIM.UPPER]|[DATA.NAME.TRIM.LOWER]").unwrap(),
        "JANE DOE|jane doe"
    );
}

#[test]
fn builtins_split_join() {
    assert_eq!(splice("[DATA.PATH.SPLIT='/'.JOIN='\\']").unwrap(), "\\usr\\local\\bin");
    assert_eq!(splice("[DATA.TAGS.JOIN]").unwrap(), "a,b,c");
    assert_eq!(splice("[DATA.TAGS.JOIN=' - ']").unwrap(), "a - b - c");
    assert_eq!(splice("[DATA.NAME.SPLIT.LEN]").unwrap(), "2");
}

#[test]
fn builtins_word_item_first_last() {
    assert_eq!(splice("[DATA.NAME.WORD=1]").unwrap(), "Doe");
    assert_eq!(splice("[DATA.TAGS.ITEM=-2]").unwrap(), "b");
    assert_eq!(splice("[DATA.TAGS.FIRST][DATA.TAGS.LAST]").unwrap(), "ac");
    assert_eq!(splice("[DATA.TAGS.REVERSE]").unwrap(), "c;b;a");
}

#[test]
fn builtins_len() {
    assert_eq!(splice("[DATA.TAGS.LEN] [DATA.EMPTY.LEN]").unwrap(), "3 0");
    let err = splice("[DATA.COUNT.LEN]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn builtins_mask() {
    assert_eq!(splice("[DATA.TOKEN.MASK]").unwrap(), "*********7890");
    assert_eq!(splice("[DATA.TOKEN.MASK=2]").unwrap(), "***********90");
}

#[test]
fn builtins_conditionals() {
    assert_eq!(splice("<[DATA.OFF.IF='on']>").unwrap(), "<>");
    assert_eq!(splice("<[DATA.COUNT.IF='on']>").unwrap(), "<on>");
    assert_eq!(splice("[DATA.OFF.NOT]").unwrap(), "true");
    assert_eq!(splice("[DATA.EMPTY.NULL='fallback']").unwrap(), "fallback");
    assert_eq!(splice("[DATA.COUNT.NULL='fallback']").unwrap(), "7");
}

#[test]
fn builtins_arithmetic() {
    assert_eq!(splice("[DATA.COUNT.ADD=3]").unwrap(), "10");
    assert_eq!(splice("[DATA.COUNT.SUB=10]").unwrap(), "-3");
    assert_eq!(splice("[DATA.COUNT.MUL=[DATA.RATIO]]").unwrap(), "3.5");
    assert_eq!(splice("[DATA.COUNT.DIV=2]").unwrap(), "3");
    assert_eq!(splice("[DATA.COUNT.MOD=4]").unwrap(), "3");
    assert_eq!(splice("[DATA.COUNT.STR.ADD='1']").unwrap(), "8");
}

#[test]
fn builtins_division_by_zero() {
    let err = splice("[DATA.COUNT.DIV=0]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(
        err.to_string(),
        "DIV: division by zero in sigil `[DATA.COUNT.DIV=0]`"
    );
}

#[test]
fn builtins_comparisons() {
    assert_eq!(
        splice("[DATA.COUNT.EQ=7] [DATA.COUNT.NE=7] [DATA.COUNT.LT=10] [DATA.COUNT.GE=8]").unwrap(),
        "true false true false"
    );
    assert_eq!(splice("[DATA.RATIO.GT=0]").unwrap(), "true");
}

#[test]
fn builtins_conversions() {
    assert_eq!(splice("[DATA.RATIO.STR.LEN]").unwrap(), "3");
    assert_eq!(splice("[INT='42'.ADD=1]").unwrap(), "43");
    assert_eq!(splice("[DATA.RATIO.INT]").unwrap(), "0");
    assert_eq!(splice("[FLOAT='2.5'.MUL=2]").unwrap(), "5");
}

#[test]
fn builtins_sys() {
    assert_eq!(splice("[SYS.OS]").unwrap(), std::env::consts::OS);
    assert_eq!(splice("[SYS.PID]").unwrap(), std::process::id().to_string());
}

#[test]
fn builtins_sys_env() {
    let mut ctx = Context::new();
    let result = Engine::new()
        .splice("[SYS.ENV.SIGILS_TEST_SURELY_UNSET]", &mut ctx)
        .with_on_error(OnError::Default("unset".into()))
        .to_string()
        .unwrap();
    assert_eq!(result, "unset");
}

#[test]
fn builtins_sys_env_any_case() {
    std::env::set_var("SIGILS_TEST_DEPLOY_HOST", "db.internal");
    assert_eq!(splice("[SYS.ENV.SIGILS_TEST_DEPLOY_HOST]").unwrap(), "db.internal");
    assert_eq!(splice("[SYS.ENV.sigils_test_deploy_host]").unwrap(), "db.internal");
}

#[test]
fn builtins_shadowed_by_context() {
    let mut ctx = Context::new();
    ctx.set("UPPER", "not a function");
    ctx.set("NAME", "x");
    let err = Engine::new()
        .splice("[NAME.UPPER]", &mut ctx)
        .to_string()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldNotFound);
    assert!(Context::new().get("UPPER").is_some());
}
