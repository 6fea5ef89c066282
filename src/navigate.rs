//! Stateless walks over the node store. Nothing in here mutates the tree.

use std::cmp::Ordering;

use compare::Compare;

use crate::node_store::{NodeHandle, NodeStore};

/// Which child slot of a parent a node hangs off.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Where a key lives, or where it would be linked if it were inserted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Location {
    Found(NodeHandle),

    /// `parent` is None only when the tree is empty.
    Vacant {
        parent: Option<NodeHandle>,
        side: Side,
    },
}

/// Follows left links down from `at` as far as they go.
pub(crate) fn leftmost<K, V>(
    store: &NodeStore<K, V>,
    mut at: NodeHandle,
) -> NodeHandle {
    while let Some(left) = store.left(at) {
        at = left;
    }
    at
}

/// Follows right links down from `at` as far as they go.
pub(crate) fn rightmost<K, V>(
    store: &NodeStore<K, V>,
    mut at: NodeHandle,
) -> NodeHandle {
    while let Some(right) = store.right(at) {
        at = right;
    }
    at
}

/// The next node in key order, or None past the last one.
///
/// With a right subtree that's its leftmost node. Otherwise climb while we're
/// the right child of our parent; the first parent we reach from its left
/// side is next.
pub(crate) fn successor<K, V>(
    store: &NodeStore<K, V>,
    node: NodeHandle,
) -> Option<NodeHandle> {
    if let Some(right) = store.right(node) {
        return Some(leftmost(store, right));
    }

    let mut current = node;
    let mut parent = store.parent(current);
    while let Some(p) = parent {
        if store.right(p) != Some(current) {
            break;
        }
        current = p;
        parent = store.parent(p);
    }

    parent
}

/// Descends from `root` looking for `key`, remembering the last node visited
/// and which way we stepped off it.
pub(crate) fn locate<K, V, C>(
    store: &NodeStore<K, V>,
    root: Option<NodeHandle>,
    key: &K,
    comparator: &C,
) -> Location
where
    C: Compare<K>,
{
    let mut parent = None;
    let mut side = Side::Left;
    let mut current = root;

    while let Some(handle) = current {
        let node = match store.get(handle) {
            Some(node) => node,
            None => break,
        };

        parent = Some(handle);
        match comparator.compare(key, &node.key) {
            Ordering::Less => {
                side = Side::Left;
                current = node.left;
            }
            Ordering::Greater => {
                side = Side::Right;
                current = node.right;
            }
            Ordering::Equal => return Location::Found(handle),
        }
    }

    Location::Vacant { parent, side }
}

/// The node holding `key`, if any.
pub(crate) fn find<K, V, C>(
    store: &NodeStore<K, V>,
    root: Option<NodeHandle>,
    key: &K,
    comparator: &C,
) -> Option<NodeHandle>
where
    C: Compare<K>,
{
    match locate(store, root, key, comparator) {
        Location::Found(handle) => Some(handle),
        Location::Vacant { .. } => None,
    }
}
