use std::collections::HashMap;

use crate::Value;

/// Resolved values keyed by the exact sigil text.
///
/// The owning context clears it whenever a layer is pushed or popped, so
/// every entry was computed against the current layer stack.
#[derive(Debug, Default)]
pub(crate) struct Cache {
    entries: HashMap<String, Value>,
}

impl Cache {
    pub fn get(&self, sigil: &str) -> Option<&Value> {
        self.entries.get(sigil)
    }

    pub fn insert(&mut self, sigil: &str, value: Value) {
        self.entries.insert(sigil.to_owned(), value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
