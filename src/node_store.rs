//! Flattens every node of a tree onto a Vec, addressing them by slot index
//! instead of by pointer. Links between nodes are plain handles, so
//! reparenting a subtree never leaves a dangling reference behind.

use std::collections::TryReserveError;

/// Alias for the index of a node in the store's slot vec.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeHandle(pub(crate) usize);

/// A node that lives in the tree.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,

    /// Back-reference to the parent. Never an ownership edge.
    pub(crate) parent: Option<NodeHandle>,

    pub(crate) left: Option<NodeHandle>,
    pub(crate) right: Option<NodeHandle>,
}

impl<K, V> Node<K, V> {
    /// A detached node with no links.
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            parent: None,
            left: None,
            right: None,
        }
    }
}

/// A single contiguous Vec of slots plus a freelist of slots which aren't in
/// use anymore. Released slots are vacated immediately (their pair is handed
/// back to the caller) and get reused by the next allocation. There is no
/// compaction.
#[derive(Clone, Debug)]
pub(crate) struct NodeStore<K, V> {
    /// The slots. `None` marks a slot sitting on the freelist.
    pub(crate) slots: Vec<Option<Node<K, V>>>,

    /// Slots which aren't in use anymore. These will be reused.
    free: Vec<NodeHandle>,

    /// Makes the next `try_alloc` behave as if the allocator said no.
    #[cfg(test)]
    pub(crate) refuse_next_reserve: bool,
}

impl<K, V> NodeStore<K, V> {
    /// Creates a new store with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            #[cfg(test)]
            refuse_next_reserve: false,
        }
    }

    /// The number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Moves a fully constructed node into the store and returns its handle.
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeHandle {
        // use the first available slot, or infer what the next location will
        // be on push.
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx.0] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                NodeHandle(self.slots.len() - 1)
            }
        }
    }

    /// Like `alloc`, but reports a failed allocation instead of aborting. The
    /// store is untouched on failure and the node is dropped.
    pub(crate) fn try_alloc(
        &mut self,
        node: Node<K, V>,
    ) -> Result<NodeHandle, TryReserveError> {
        // no Vec can hold usize::MAX more slots, so this always fails
        #[cfg(test)]
        {
            if std::mem::take(&mut self.refuse_next_reserve) {
                self.slots.try_reserve(usize::MAX)?;
            }
        }

        if self.free.is_empty() {
            self.slots.try_reserve(1)?;
        }

        Ok(self.alloc(node))
    }

    /// Vacates a slot and hands the node back. Returns None if the slot was
    /// already vacant.
    pub(crate) fn release(&mut self, handle: NodeHandle) -> Option<Node<K, V>> {
        let node = self.slots.get_mut(handle.0)?.take()?;
        self.free.push(handle);
        Some(node)
    }

    pub(crate) fn get(&self, handle: NodeHandle) -> Option<&Node<K, V>> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(
        &mut self,
        handle: NodeHandle,
    ) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Whether the handle points at a live node.
    pub(crate) fn is_live(&self, handle: NodeHandle) -> bool {
        self.get(handle).is_some()
    }

    pub(crate) fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.get(handle).and_then(|n| n.parent)
    }

    pub(crate) fn left(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.get(handle).and_then(|n| n.left)
    }

    pub(crate) fn right(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.get(handle).and_then(|n| n.right)
    }

    pub(crate) fn set_parent(
        &mut self,
        handle: NodeHandle,
        parent: Option<NodeHandle>,
    ) {
        if let Some(node) = self.get_mut(handle) {
            node.parent = parent;
        }
    }

    pub(crate) fn set_left(
        &mut self,
        handle: NodeHandle,
        left: Option<NodeHandle>,
    ) {
        if let Some(node) = self.get_mut(handle) {
            node.left = left;
        }
    }

    pub(crate) fn set_right(
        &mut self,
        handle: NodeHandle,
        right: Option<NodeHandle>,
    ) {
        if let Some(node) = self.get_mut(handle) {
            node.right = right;
        }
    }

    /// Drops every node. Does not free the underlying buffers.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeHandle, NodeStore};

    #[test]
    fn released_slots_are_reused() {
        let mut store: NodeStore<u32, &str> = NodeStore::with_capacity(4);

        let a = store.alloc(Node::new(1, "a"));
        let b = store.alloc(Node::new(2, "b"));
        assert_eq!(2, store.len());

        let released = store.release(a).map(|n| (n.key, n.value));
        assert_eq!(Some((1, "a")), released);
        assert_eq!(1, store.len());
        assert!(!store.is_live(a));

        // a second release of the same slot is a no-op
        assert!(store.release(a).is_none());
        assert_eq!(1, store.len());

        // the freed slot is handed out again before the vec grows
        let c = store.alloc(Node::new(3, "c"));
        assert_eq!(a, c);
        assert_eq!(2, store.slots.len());
        assert!(store.is_live(b));
    }

    #[test]
    fn links_on_vacant_slots_read_as_absent() {
        let mut store: NodeStore<u32, ()> = NodeStore::with_capacity(0);
        let a = store.alloc(Node::new(1, ()));
        let b = store.alloc(Node::new(2, ()));

        store.set_right(a, Some(b));
        store.set_parent(b, Some(a));
        assert_eq!(Some(b), store.right(a));
        assert_eq!(Some(a), store.parent(b));

        store.release(a);
        assert_eq!(None, store.right(a));
        assert_eq!(None, store.left(NodeHandle(99)));
    }

    #[test]
    fn try_alloc_links_nothing_extra() {
        let mut store: NodeStore<u32, u32> = NodeStore::with_capacity(0);
        let a = store.try_alloc(Node::new(7, 70)).map_err(|e| e.to_string());
        assert_eq!(Ok(NodeHandle(0)), a);
        assert_eq!(1, store.len());
    }

    #[test]
    fn try_alloc_failure_leaves_store_alone() {
        let mut store: NodeStore<u32, u32> = NodeStore::with_capacity(0);
        let a = store.alloc(Node::new(1, 1));

        store.refuse_next_reserve = true;
        assert!(store.try_alloc(Node::new(2, 2)).is_err());
        assert_eq!(1, store.len());
        assert_eq!(1, store.slots.len());
        assert!(store.is_live(a));

        // only the one allocation is refused
        assert!(store.try_alloc(Node::new(2, 2)).is_ok());
        assert_eq!(2, store.len());
    }

    #[test]
    fn clear_drops_everything() {
        let mut store: NodeStore<u32, u32> = NodeStore::with_capacity(2);
        let a = store.alloc(Node::new(1, 1));
        store.alloc(Node::new(2, 2));
        store.release(a);

        store.clear();
        assert_eq!(0, store.len());
        assert_eq!(NodeHandle(0), store.alloc(Node::new(3, 3)));
    }
}
