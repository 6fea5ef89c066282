//! Positions in a TreeMap and the iterators that walk it in key order.

use std::iter::FusedIterator;

use crate::navigate::successor;
use crate::node_store::{NodeHandle, NodeStore};

/// A position in a TreeMap: either a node, or the end.
///
/// A cursor is just a handle. It doesn't borrow the map, so it survives
/// mutation, but it only stays meaningful until the node it names is erased
/// or the map is cleared. Using it past that point is a logic error the map
/// won't catch; erasing through a cursor whose slot has since been reused
/// removes whatever entry now lives there.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cursor(Option<NodeHandle>);

impl Cursor {
    pub(crate) fn at(handle: NodeHandle) -> Self {
        Cursor(Some(handle))
    }

    pub(crate) fn from_handle(handle: Option<NodeHandle>) -> Self {
        Cursor(handle)
    }

    /// The one-past-the-last position.
    pub fn end() -> Self {
        Cursor(None)
    }

    /// Whether this is the end position.
    pub fn is_end(&self) -> bool {
        self.0.is_none()
    }

    pub(crate) fn handle(&self) -> Option<NodeHandle> {
        self.0
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::end()
    }
}

/// Walks a map's entries in key order.
pub struct Iter<'a, K, V> {
    store: &'a NodeStore<K, V>,
    next: Option<NodeHandle>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(
        store: &'a NodeStore<K, V>,
        first: Option<NodeHandle>,
        len: usize,
    ) -> Self {
        Self {
            store,
            next: first,
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        let store: &'a NodeStore<K, V> = self.store;

        if let Some(node) = store.get(handle) {
            self.next = successor(store, handle);
            self.remaining = self.remaining.saturating_sub(1);
            return Some((&node.key, &node.value));
        }

        self.next = None;
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

/// The keys of a map, in order.
pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Self {
        Keys(self.0.clone())
    }
}

/// The values of a map, in key order.
pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

impl<'a, K, V> Clone for Values<'a, K, V> {
    fn clone(&self) -> Self {
        Values(self.0.clone())
    }
}

/// Owning iterator over a map's entries in key order.
pub struct IntoIter<K, V>(std::vec::IntoIter<(K, V)>);

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(pairs: Vec<(K, V)>) -> Self {
        IntoIter(pairs.into_iter())
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::node_store::NodeHandle;
    use crate::TreeMap;

    #[test]
    fn test_cursor_equality_is_by_node() {
        assert_eq!(Cursor::end(), Cursor::default());
        assert!(Cursor::end().is_end());

        assert_eq!(Cursor::at(NodeHandle(3)), Cursor::at(NodeHandle(3)));
        assert_ne!(Cursor::at(NodeHandle(3)), Cursor::at(NodeHandle(4)));
        assert_ne!(Cursor::at(NodeHandle(3)), Cursor::end());
    }

    #[test]
    fn test_keys_and_values_clone_and_stay_done() {
        let map = TreeMap::from([(2, 'b'), (1, 'a')]);

        let mut keys = map.keys();
        assert_eq!(Some(&1), keys.next());
        let rest = keys.clone();
        assert_eq!(Some(&2), keys.next());
        assert_eq!(None, keys.next());
        assert_eq!(None, keys.next());
        assert_eq!(vec![&2], rest.collect::<Vec<_>>());

        let mut values = map.values();
        let all = values.clone();
        assert_eq!(2, values.by_ref().count());
        assert_eq!(None, values.next());
        assert_eq!(vec![&'a', &'b'], all.collect::<Vec<_>>());
    }
}
