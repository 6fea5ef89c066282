//! An ordered map on top of a plain, unbalanced binary search tree.

use std::{
    fmt,
    iter::FromIterator,
    ops::{Index, IndexMut},
};

use compare::{Compare, Natural};
use tracing::trace;

use crate::cursor::{Cursor, IntoIter, Iter, Keys, Values};
use crate::error::MapError;
use crate::navigate::{find, leftmost, locate, rightmost, successor, Location, Side};
use crate::node_store::{Node, NodeHandle, NodeStore};

/// A map which keeps its keys sorted by a [`Compare`]. Keys are unique.
///
/// The tree under it is never rebalanced, so its height (and with it the cost
/// of every lookup, insert and erase) depends on the order keys arrive in.
/// Feeding it already-sorted keys degrades it into a list.
///
/// Nodes live in a slot vec and are linked by index, which is what makes
/// [`Cursor`]s cheap: a cursor is a slot index and nothing more.
#[derive(Clone)]
pub struct TreeMap<K, V, C = Natural<K>> {
    store: NodeStore<K, V>,
    root: Option<NodeHandle>,
    size: usize,
    comparator: C,
}

impl<K, V> TreeMap<K, V, Natural<K>>
where
    K: Ord,
{
    /// Makes a new, empty TreeMap ordered by `Ord`.
    pub fn new() -> Self {
        TreeMap::with_capacity(0)
    }

    /// Makes a new TreeMap with room for `capacity` entries before the node
    /// store has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        TreeMap::with_capacity_and_comparator(capacity, Natural::default())
    }
}

impl<K, V, C> Default for TreeMap<K, V, C>
where
    C: Compare<K> + Default,
{
    fn default() -> Self {
        TreeMap::with_capacity_and_comparator(0, C::default())
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Compare<K>,
{
    /// Makes a new, empty TreeMap ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        TreeMap::with_capacity_and_comparator(0, comparator)
    }

    /// Makes a new TreeMap with a specified capacity and ordering.
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        TreeMap {
            store: NodeStore::with_capacity(capacity),
            root: None,
            size: 0,
            comparator,
        }
    }

    /// The comparator keys are ordered by.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Inserts a key and value. If the key is already present the map is left
    /// alone and the cursor points at the existing entry; the bool says
    /// whether anything was inserted.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        match locate(&self.store, self.root, &key, &self.comparator) {
            Location::Found(handle) => (Cursor::at(handle), false),
            Location::Vacant { parent, side } => {
                let handle = self.store.alloc(Node::new(key, value));
                self.link(handle, parent, side);

                #[cfg(test)]
                self.check_invariants();

                (Cursor::at(handle), true)
            }
        }
    }

    /// Same as `insert`, for callers holding a pair.
    pub fn insert_pair(&mut self, pair: (K, V)) -> (Cursor, bool) {
        self.insert(pair.0, pair.1)
    }

    /// Like `insert`, but a node that can't be allocated comes back as an
    /// error with the map untouched.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Cursor, bool), MapError> {
        match locate(&self.store, self.root, &key, &self.comparator) {
            Location::Found(handle) => Ok((Cursor::at(handle), false)),
            Location::Vacant { parent, side } => {
                let handle = self.store.try_alloc(Node::new(key, value))?;
                self.link(handle, parent, side);

                #[cfg(test)]
                self.check_invariants();

                Ok((Cursor::at(handle), true))
            }
        }
    }

    /// Inserts a key and value, overwriting the value in place if the key is
    /// already present. The bool says whether a new entry was made.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Cursor, bool) {
        match locate(&self.store, self.root, &key, &self.comparator) {
            Location::Found(handle) => {
                if let Some(node) = self.store.get_mut(handle) {
                    node.value = value;
                }
                (Cursor::at(handle), false)
            }
            Location::Vacant { parent, side } => {
                let handle = self.store.alloc(Node::new(key, value));
                self.link(handle, parent, side);

                #[cfg(test)]
                self.check_invariants();

                (Cursor::at(handle), true)
            }
        }
    }

    /// Hangs a freshly allocated node off `parent` (or makes it the root).
    fn link(&mut self, handle: NodeHandle, parent: Option<NodeHandle>, side: Side) {
        self.store.set_parent(handle, parent);

        match (parent, side) {
            (None, _) => self.root = Some(handle),
            (Some(p), Side::Left) => self.store.set_left(p, Some(handle)),
            (Some(p), Side::Right) => self.store.set_right(p, Some(handle)),
        }

        self.size += 1;
    }

    /// Puts `new` where `old` hangs in the tree. `old`'s own links are left as
    /// they were.
    fn transplant(&mut self, old: NodeHandle, new: Option<NodeHandle>) {
        let parent = self.store.parent(old);

        match parent {
            None => self.root = new,
            Some(p) if self.store.left(p) == Some(old) => self.store.set_left(p, new),
            Some(p) => self.store.set_right(p, new),
        }

        if let Some(n) = new {
            self.store.set_parent(n, parent);
        }
    }

    /// Removes the entry at `position` and hands it back.
    ///
    /// Returns None for the end cursor or a cursor whose node is already gone.
    /// Any other cursor naming the erased node is invalid afterwards.
    pub fn erase(&mut self, position: Cursor) -> Option<(K, V)> {
        let target = position.handle()?;
        if !self.store.is_live(target) {
            return None;
        }

        let left = self.store.left(target);
        let right = self.store.right(target);

        match (left, right) {
            (None, _) => {
                trace!(size = self.size, "erase: splicing in right child");
                self.transplant(target, right);
            }
            (Some(_), None) => {
                trace!(size = self.size, "erase: splicing in left child");
                self.transplant(target, left);
            }
            (Some(left), Some(right)) => {
                // the successor has no left child, so it can take target's
                let successor = leftmost(&self.store, right);
                trace!(size = self.size, "erase: promoting successor");

                if self.store.parent(successor) != Some(target) {
                    let successor_right = self.store.right(successor);
                    self.transplant(successor, successor_right);
                    self.store.set_right(successor, Some(right));
                    self.store.set_parent(right, Some(successor));
                }

                self.transplant(target, Some(successor));
                self.store.set_left(successor, Some(left));
                self.store.set_parent(left, Some(successor));
            }
        }

        let node = self.store.release(target)?;
        self.size -= 1;

        #[cfg(test)]
        self.check_invariants();

        Some((node.key, node.value))
    }

    /// Removes `key` from the map, returning its value if it was there.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let position = self.find(key);
        self.erase(position).map(|(_, v)| v)
    }

    /// Moves every entry of `other` whose key isn't in this map over to this
    /// map. Entries whose keys collide stay in `other`, untouched.
    pub fn merge(&mut self, other: &mut TreeMap<K, V, C>) {
        let mut moved = 0usize;
        let mut current = other.begin().handle();

        while let Some(handle) = current {
            // erasing rewires the links successor() reads, so step first
            current = successor(&other.store, handle);

            let location = match other.store.get(handle) {
                Some(node) => locate(&self.store, self.root, &node.key, &self.comparator),
                None => break,
            };

            if let Location::Vacant { parent, side } = location {
                if let Some((key, value)) = other.erase(Cursor::at(handle)) {
                    let new_handle = self.store.alloc(Node::new(key, value));
                    self.link(new_handle, parent, side);
                    moved += 1;
                }
            }
        }

        trace!(moved, kept = other.size, "merge finished");

        #[cfg(test)]
        {
            self.check_invariants();
            other.check_invariants();
        }
    }

    /// Trades contents with `other`.
    pub fn swap(&mut self, other: &mut TreeMap<K, V, C>) {
        std::mem::swap(self, other);
    }

    /// Drops every entry. Any outstanding cursor is invalid afterwards.
    pub fn clear(&mut self) {
        trace!(size = self.size, "clearing map");
        self.store.clear();
        self.root = None;
        self.size = 0;

        #[cfg(test)]
        self.check_invariants();
    }

    /// Replaces the contents with `pairs`, inserted in order. Earlier pairs win
    /// over later ones with the same key.
    pub fn assign<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.clear();
        for (k, v) in pairs {
            self.insert(k, v);
        }
    }

    /// Whether `key` is in the map.
    pub fn contains(&self, key: &K) -> bool {
        find(&self.store, self.root, key, &self.comparator).is_some()
    }

    /// The position of `key`, or the end cursor if it isn't there.
    pub fn find(&self, key: &K) -> Cursor {
        Cursor::from_handle(find(&self.store, self.root, key, &self.comparator))
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        let handle = find(&self.store, self.root, key, &self.comparator)?;
        self.store.get(handle).map(|n| &n.value)
    }

    /// The value stored under `key`, mutably, if any.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let handle = find(&self.store, self.root, key, &self.comparator)?;
        self.store.get_mut(handle).map(|n| &mut n.value)
    }

    /// Checked access. A missing key is an error; nothing gets inserted.
    pub fn at(&self, key: &K) -> Result<&V, MapError> {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    /// Checked mutable access. A missing key is an error; nothing gets
    /// inserted.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, MapError> {
        self.get_mut(key).ok_or(MapError::KeyNotFound)
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        let mut reachable = 0;
        let mut stack: Vec<NodeHandle> = self.root.into_iter().collect();

        if let Some(root) = self.root {
            assert_eq!(None, self.store.parent(root), "root has a parent");
        }

        // every child must point back at the node it hangs off
        while let Some(handle) = stack.pop() {
            reachable += 1;
            assert!(reachable <= self.size, "more nodes reachable than counted");

            for child in [self.store.left(handle), self.store.right(handle)]
                .iter()
                .flatten()
            {
                assert_eq!(Some(handle), self.store.parent(*child));
                stack.push(*child);
            }
        }

        assert_eq!(self.size, reachable);
        assert_eq!(self.size, self.store.len());

        // in-order must be strictly increasing
        let keys: Vec<&K> = self.keys().collect();
        for pair in keys.windows(2) {
            assert_eq!(
                std::cmp::Ordering::Less,
                self.comparator.compare(pair[0], pair[1]),
                "keys out of order"
            );
        }
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// The number of entries in the map.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The position of the smallest key, or the end cursor if the map is empty.
    pub fn begin(&self) -> Cursor {
        Cursor::from_handle(self.root.map(|r| leftmost(&self.store, r)))
    }

    /// The one-past-the-last position. Always the same value.
    pub fn end(&self) -> Cursor {
        Cursor::end()
    }

    /// The position after `position` in key order. Advancing the end cursor,
    /// or a cursor whose node is gone, yields the end cursor.
    pub fn advance(&self, position: Cursor) -> Cursor {
        match position.handle() {
            Some(handle) if self.store.is_live(handle) => {
                Cursor::from_handle(successor(&self.store, handle))
            }
            _ => Cursor::end(),
        }
    }

    /// The entry at `position`, if it names a live node.
    pub fn entry(&self, position: Cursor) -> Option<(&K, &V)> {
        let node = self.store.get(position.handle()?)?;
        Some((&node.key, &node.value))
    }

    /// The value at `position`, mutably. Keys can't be changed in place.
    pub fn value_mut(&mut self, position: Cursor) -> Option<&mut V> {
        let node = self.store.get_mut(position.handle()?)?;
        Some(&mut node.value)
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry(self.begin())
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let handle = rightmost(&self.store, self.root?);
        self.entry(Cursor::at(handle))
    }

    /// Walks the entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.store, self.begin().handle(), self.size)
    }

    /// Walks the keys in order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Walks the values in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }
}

impl<'a, K, V, C> Index<&'a K> for TreeMap<K, V, C>
where
    C: Compare<K>,
{
    type Output = V;

    /// Panics with a key-not-found message when `key` is absent. Use `at` or
    /// `get` for a non-panicking lookup.
    fn index(&self, key: &'a K) -> &V {
        match self.at(key) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<'a, K, V, C> IndexMut<&'a K> for TreeMap<K, V, C>
where
    C: Compare<K>,
{
    fn index_mut(&mut self, key: &'a K) -> &mut V {
        match self.at_mut(key) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<K, V, C> FromIterator<(K, V)> for TreeMap<K, V, C>
where
    C: Compare<K> + Default,
{
    /// Inserts in order; the first pair seen for a key wins.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TreeMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C> Extend<(K, V)> for TreeMap<K, V, C>
where
    C: Compare<K>,
{
    /// Inserts in order. Keys already present keep their values.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for TreeMap<K, V, Natural<K>>
where
    K: Ord,
{
    fn from(pairs: [(K, V); N]) -> Self {
        let mut map = TreeMap::with_capacity(N);
        map.extend(IntoIterator::into_iter(pairs));
        map
    }
}

impl<K, V, C> IntoIterator for TreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> IntoIter<K, V> {
        let mut order = Vec::with_capacity(self.size);
        let mut current = self.begin().handle();
        while let Some(handle) = current {
            order.push(handle);
            current = successor(&self.store, handle);
        }

        let store = &mut self.store;
        let pairs = order
            .into_iter()
            .filter_map(|handle| store.release(handle))
            .map(|node| (node.key, node.value))
            .collect();

        IntoIter::new(pairs)
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> PartialEq for TreeMap<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
{
    /// Same entries in the same order. Tree shape doesn't matter.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, C> Eq for TreeMap<K, V, C>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V, C> fmt::Debug for TreeMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Dumps the entries in key order as `{k: v, k: v}`. Meant for eyeballs, not
/// for parsing.
impl<K, V, C> fmt::Display for TreeMap<K, V, C>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}
