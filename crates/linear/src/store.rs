//! Lock-free value storage
//!
//! Thin wrapper over [`DashMap`] exposing the primitives the container relies
//! on: load, store, delete and a key snapshot for iteration. Each call is internally
//! synchronized; ordering between calls is the caller's concern.

use dashmap::DashMap;

/// Concurrent map from key to value
#[derive(Debug)]
pub struct ValueStore<V> {
    items: DashMap<String, V>,
}

impl<V> ValueStore<V> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Clone of the value stored under `key`
    pub fn load(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.items.get(key).map(|entry| entry.value().clone())
    }

    /// Applies `f` to the value under `key` without cloning it
    pub fn inspect<R>(&self, key: &str, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.items.get(key).map(|entry| f(entry.value()))
    }

    /// Stores `value`, returning the value it replaced
    pub fn store(&self, key: String, value: V) -> Option<V> {
        self.items.insert(key, value)
    }

    /// Removes and returns the value under `key`
    pub fn delete(&self, key: &str) -> Option<V> {
        self.items.remove(key).map(|(_, value)| value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of the stored keys in map iteration order.
    ///
    /// No shard guard outlives this call, so callers may touch the store
    /// while walking the snapshot.
    pub fn keys(&self) -> Vec<String> {
        self.items.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl<V> Default for ValueStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
