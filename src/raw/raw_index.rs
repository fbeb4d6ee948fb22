use core::borrow::Borrow;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{InternalNode, LeafNode, Node, SearchResult};
use crate::Order;

/// The core B+Tree implementation backing `OrderedIndex`.
#[derive(Clone)]
pub(crate) struct RawOrderedIndex<K, R> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, R>>,
    /// Handle to the root node. The tree always has one, starting as an empty leaf.
    root: Handle,
    /// Handle to the leftmost leaf. Splits keep the lower half in place, so this never moves.
    first_leaf: Handle,
    /// Maximum keys per node before a split.
    order: Order,
    /// Number of distinct keys.
    len: usize,
    /// Number of records across all keys.
    record_count: usize,
    /// Number of levels, counting the leaves.
    height: usize,
}

impl<K, R> RawOrderedIndex<K, R> {
    /// Creates a new tree holding a single empty root leaf.
    pub(crate) fn new(order: Order) -> Self {
        Self::from_arena(Arena::new(), order)
    }

    /// Creates a new tree with node storage reserved for about `capacity` keys.
    pub(crate) fn with_capacity(order: Order, capacity: usize) -> Self {
        Self::from_arena(Arena::with_capacity(capacity.div_ceil(order.get())), order)
    }

    fn from_arena(mut nodes: Arena<Node<K, R>>, order: Order) -> Self {
        let root = nodes.alloc(Node::Leaf(LeafNode::new()));
        Self {
            nodes,
            root,
            first_leaf: root,
            order,
            len: 0,
            record_count: 0,
            height: 1,
        }
    }

    pub(crate) const fn order(&self) -> Order {
        self.order
    }

    /// Returns the number of distinct keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) const fn record_count(&self) -> usize {
        self.record_count
    }

    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of allocated nodes.
    pub(crate) const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn root(&self) -> Handle {
        self.root
    }

    pub(crate) const fn first_leaf(&self) -> Handle {
        self.first_leaf
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, R> {
        self.nodes.get(handle)
    }
}

impl<K: Clone + Ord, R> RawOrderedIndex<K, R> {
    /// Descends from the root to the leaf whose key range covers `key`.
    fn find_leaf<Q>(&self, key: &Q) -> Handle
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        loop {
            match self.nodes.get(current) {
                Node::Internal(internal) => current = internal.child(internal.route(key)),
                Node::Leaf(_) => return current,
            }
        }
    }

    /// Searches for a key and returns the leaf handle and slot index if found.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<(Handle, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let leaf_handle = self.find_leaf(key);
        match self.nodes.get(leaf_handle).as_leaf().search(key) {
            SearchResult::Found(idx) => Some((leaf_handle, idx)),
            SearchResult::NotFound(_) => None,
        }
    }

    /// Returns the records accumulated under `key`.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&[R]>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (leaf_handle, idx) = self.search(key)?;
        Some(self.nodes.get(leaf_handle).as_leaf().records(idx))
    }

    /// Inserts `record` under `key`.
    ///
    /// An existing key gets the record appended to its list and the tree
    /// shape is left alone. A new key opens a slot in sorted position, which
    /// may overflow the leaf and start a chain of splits toward the root.
    pub(crate) fn insert(&mut self, key: K, record: R) {
        let leaf_handle = self.find_leaf(&key);
        let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();
        self.record_count += 1;

        match leaf.search(&key) {
            SearchResult::Found(idx) => leaf.push_record(idx, record),
            SearchResult::NotFound(idx) => {
                leaf.insert(idx, key, record);
                self.len += 1;

                if leaf.key_count() > self.order.get() {
                    self.split_leaf(leaf_handle);
                }
            }
        }
    }

    /// Splits an overflowing leaf and hands the new sibling to its parent.
    fn split_leaf(&mut self, leaf_handle: Handle) {
        let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();
        let (separator, right_leaf) = leaf.split();

        let right_handle = self.nodes.alloc(Node::Leaf(right_leaf));
        self.nodes.get_mut(leaf_handle).as_leaf_mut().set_next(Some(right_handle));

        log::trace!("split leaf {leaf_handle:?} into {leaf_handle:?} and {right_handle:?}");

        self.propagate_split(leaf_handle, separator, right_handle);
    }

    /// Inserts `separator` and `right` into the parent of `left`, splitting
    /// ancestors for as long as they overflow.
    ///
    /// Each pass either absorbs the new child into a parent with room, or
    /// splits that parent and moves one level up. Running out of parents
    /// grows a new root.
    fn propagate_split(&mut self, mut left: Handle, mut separator: K, mut right: Handle) {
        loop {
            let Some(parent_handle) = self.nodes.get(left).parent() else {
                self.grow_root(left, separator, right);
                return;
            };

            let parent = self.nodes.get_mut(parent_handle).as_internal_mut();
            let index = parent.insert_separator(separator, right);
            debug_assert_eq!(parent.child(index), left, "separator landed away from its left child");
            let overflow = parent.key_count() > self.order.get();
            self.nodes.get_mut(right).set_parent(Some(parent_handle));

            if !overflow {
                return;
            }

            let parent = self.nodes.get_mut(parent_handle).as_internal_mut();
            let (median, right_internal) = parent.split();
            let right_handle = self.nodes.alloc(Node::Internal(right_internal));
            self.adopt_children(right_handle);

            log::trace!("split internal {parent_handle:?} into {parent_handle:?} and {right_handle:?}");

            left = parent_handle;
            separator = median;
            right = right_handle;
        }
    }

    /// Points every child of `handle` back at it.
    fn adopt_children(&mut self, handle: Handle) {
        let count = self.nodes.get(handle).as_internal().child_count();
        for i in 0..count {
            let child = self.nodes.get(handle).as_internal().child(i);
            self.nodes.get_mut(child).set_parent(Some(handle));
        }
    }

    /// Places a new root above the old one. This is the only way the tree grows taller.
    fn grow_root(&mut self, left: Handle, separator: K, right: Handle) {
        debug_assert_eq!(left, self.root, "only the root may lack a parent");

        let new_root = self.nodes.alloc(Node::Internal(InternalNode::new_root(left, separator, right)));
        self.nodes.get_mut(left).set_parent(Some(new_root));
        self.nodes.get_mut(right).set_parent(Some(new_root));
        self.root = new_root;
        self.height += 1;

        log::trace!("promoted new root {new_root:?}, height now {}", self.height);
    }
}
