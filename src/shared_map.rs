use compare::{Compare, Natural};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::tree_map::TreeMap;

/// Wrapper for a TreeMap which is shareable across thread boundaries. The map
/// itself has no lock of its own; this puts the whole thing behind one.
pub struct SharedMap<K, V, C = Natural<K>>(Arc<RwLock<TreeMap<K, V, C>>>)
where
    C: Compare<K>,
    V: Clone;

impl<K, V, C> SharedMap<K, V, C>
where
    C: Compare<K>,
    V: Clone,
{
    /// Wraps a map into a shared accessor, making it safe to move across
    /// thread boundaries. Enforces an additional constraint of Clone on
    /// values.
    pub fn with_map(map: TreeMap<K, V, C>) -> Self {
        Self(Arc::from(RwLock::from(map)))
    }

    /// Inserts an entry, leaving an existing one alone. Returns whether
    /// anything was inserted. Cursors don't escape the lock.
    pub fn insert(&self, k: K, v: V) -> bool {
        self.0.write().insert(k, v).1
    }

    /// Inserts an entry or overwrites an existing value.
    pub fn insert_or_assign(&self, k: K, v: V) -> bool {
        self.0.write().insert_or_assign(k, v).1
    }

    /// Get an item from the map. This clones it to minimize the lock time of
    /// the map.
    pub fn get(&self, k: &K) -> Option<V> {
        self.0.read().get(k).cloned()
    }

    /// Whether `k` is in the map.
    pub fn contains(&self, k: &K) -> bool {
        self.0.read().contains(k)
    }

    /// Remove an item from the map, returning the removed value if it existed.
    pub fn remove(&self, k: &K) -> Option<V> {
        self.0.write().remove(k)
    }

    /// Clears the map.
    pub fn clear(&self) {
        self.0.write().clear()
    }

    /// The number of entries in the map at present.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}

impl<K, V, C> Clone for SharedMap<K, V, C>
where
    C: Compare<K>,
    V: Clone,
{
    fn clone(&self) -> Self {
        SharedMap(self.0.clone())
    }
}
