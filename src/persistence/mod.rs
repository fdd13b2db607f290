//! Key-value persistence
//!
//! The game persists almost nothing: the best score and the player's
//! preferences, each a single string value under a fixed key.
//! `MemoryStore` keeps them in-process; hosts with real storage implement
//! [`KeyValueStore`] themselves.

use std::collections::HashMap;

/// Durable string storage keyed by name
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store, lost when the process exits
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls seen, across all keys
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("record"), None);

        store.set("record", "12");
        assert_eq!(store.get("record").as_deref(), Some("12"));
        assert_eq!(store.writes(), 1);

        store.set("record", "15");
        assert_eq!(store.get("record").as_deref(), Some("15"));
        assert_eq!(store.writes(), 2);
    }
}
