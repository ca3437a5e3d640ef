#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::Serialize;

#[derive(Debug, Serialize, Arbitrary)]
enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

fuzz_target!(|data: (&str, BTreeMap<String, Value>, u8)| {
    let (text, globals, depth) = data;
    let mut ctx = sigils::Context::new();
    if ctx
        .push_layer(sigils::Overlay::new().merge_serde(&globals))
        .is_err()
    {
        return;
    }
    let _ = sigils::Engine::new()
        .splice(text, &mut ctx)
        .with_max_depth(usize::from(depth % 8))
        .with_on_error(sigils::OnError::Ignore)
        .to_string();
});
