#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let engine = sigils::Engine::new();
    for sigil in engine.extract(data) {
        let _ = engine.parse(sigil);
    }
    let (text, sigils) = engine.vanish(data, "\u{0}");
    if !data.contains('\u{0}') {
        assert_eq!(engine.unvanish(&text, &sigils, "\u{0}"), data);
    }
});
