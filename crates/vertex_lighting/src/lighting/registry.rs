//! Light and lit object registries
//!
//! Both registries are dense lists of live entries plus a secondary map from
//! key to slot. Removal swaps the last entry into the freed slot, so adding
//! and removing are O(1) and the live list stays contiguous for iteration.
//! Neither registry guarantees an iteration order.

use slotmap::{Key, SecondaryMap};

use super::light::LightSource;
use crate::foundation::collections::{LightKey, LitObjectKey};

/// Dense list of values addressed by slot map keys
#[derive(Debug, Clone)]
struct DenseRegistry<K: Key, V> {
    keys: Vec<K>,
    values: Vec<V>,
    slots: SecondaryMap<K, usize>,
}

impl<K: Key, V> DenseRegistry<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            slots: SecondaryMap::with_capacity(capacity),
        }
    }

    fn insert(&mut self, key: K, value: V) -> bool {
        if self.slots.contains_key(key) {
            return false;
        }
        self.slots.insert(key, self.keys.len());
        self.keys.push(key);
        self.values.push(value);
        true
    }

    fn remove(&mut self, key: K) -> Option<V> {
        let slot = self.slots.remove(key)?;
        self.keys.swap_remove(slot);
        let value = self.values.swap_remove(slot);
        if let Some(moved) = self.keys.get(slot) {
            self.slots.insert(*moved, slot);
        }
        Some(value)
    }

    fn contains(&self, key: K) -> bool {
        self.slots.contains_key(key)
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.slots.clear();
    }
}

/// Live lights, cached for blending
#[derive(Debug, Clone)]
pub struct LightRegistry {
    entries: DenseRegistry<LightKey, LightSource>,
}

impl LightRegistry {
    /// Create an empty registry sized for a typical scene
    pub fn new() -> Self {
        Self {
            entries: DenseRegistry::with_capacity(50),
        }
    }

    /// Add a cached light; returns false if the key is already live
    pub fn insert(&mut self, source: LightSource) -> bool {
        self.entries.insert(source.id, source)
    }

    /// Remove a light by identity
    pub fn remove(&mut self, key: LightKey) -> Option<LightSource> {
        self.entries.remove(key)
    }

    /// Whether the light is live
    pub fn contains(&self, key: LightKey) -> bool {
        self.entries.contains(key)
    }

    /// Number of live lights
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no light is live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live lights as a contiguous slice
    pub fn sources(&self) -> &[LightSource] {
        &self.entries.values
    }

    /// Drop every live light
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for LightRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Live lit objects, in the order the scheduler visits them
#[derive(Debug, Clone)]
pub struct LitObjectRegistry {
    entries: DenseRegistry<LitObjectKey, ()>,
}

impl LitObjectRegistry {
    /// Create an empty registry sized for a typical scene
    pub fn new() -> Self {
        Self {
            entries: DenseRegistry::with_capacity(50),
        }
    }

    /// Add an object; returns false if it is already live
    pub fn insert(&mut self, key: LitObjectKey) -> bool {
        self.entries.insert(key, ())
    }

    /// Remove an object; returns false if it was not live
    pub fn remove(&mut self, key: LitObjectKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Whether the object is live
    pub fn contains(&self, key: LitObjectKey) -> bool {
        self.entries.contains(key)
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no object is live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live object keys
    pub fn keys(&self) -> &[LitObjectKey] {
        &self.entries.keys
    }

    /// Drop every live object
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for LitObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
