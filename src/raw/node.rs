use alloc::vec::Vec;
use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;

/// Records accumulated under a single key, in insertion order.
///
/// Almost every key carries exactly one record, so the first one lives inline.
pub(crate) type Records<R> = SmallVec<[R; 1]>;

#[allow(clippy::large_enum_variant)]
#[derive(Clone)]
pub(crate) enum Node<K, R> {
    Internal(InternalNode<K>),
    Leaf(LeafNode<K, R>),
}

// B+Tree: Internal nodes store separator keys and child handles.
#[derive(Clone)]
pub(crate) struct InternalNode<K> {
    parent: Option<Handle>,
    // children[i] holds keys < keys[i]; children[i + 1] holds keys >= keys[i].
    keys: Vec<K>,
    children: Vec<Handle>,
}

// B+Tree: Leaf nodes store keys and their record lists.
#[derive(Clone)]
pub(crate) struct LeafNode<K, R> {
    parent: Option<Handle>,
    next: Option<Handle>,
    keys: Vec<K>,
    records: Vec<Records<R>>,
}

/// Result of searching for a key in a leaf.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted.
    NotFound(usize),
}

impl<K, R> Node<K, R> {
    /// Returns the leaf node, panicking if this is not a leaf.
    pub(crate) fn as_leaf(&self) -> &LeafNode<K, R> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the leaf node mutably, panicking if this is not a leaf.
    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode<K, R> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the internal node, panicking if this is not internal.
    pub(crate) fn as_internal(&self) -> &InternalNode<K> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    /// Returns the internal node mutably, panicking if this is not internal.
    pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode<K> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    pub(crate) fn parent(&self) -> Option<Handle> {
        match self {
            Node::Internal(internal) => internal.parent,
            Node::Leaf(leaf) => leaf.parent,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        match self {
            Node::Internal(internal) => internal.parent = parent,
            Node::Leaf(leaf) => leaf.parent = parent,
        }
    }
}

impl<K> InternalNode<K> {
    /// Creates a root over two children separated by `key`.
    pub(crate) fn new_root(left: Handle, key: K, right: Handle) -> Self {
        let mut keys = Vec::with_capacity(1);
        keys.push(key);
        let mut children = Vec::with_capacity(2);
        children.push(left);
        children.push(right);
        Self {
            parent: None,
            keys,
            children,
        }
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    /// Returns the index of the child whose subtree may hold `key`.
    ///
    /// This is the number of separators `<= key`, so a key equal to a
    /// separator routes right, into the subtree whose smallest key it is.
    #[inline]
    pub(crate) fn route<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.keys.partition_point(|k| k.borrow().cmp(key).is_le())
    }

    /// Inserts `key` in sorted position with `right` directly after the child it separates.
    /// Returns the index the key landed at.
    pub(crate) fn insert_separator(&mut self, key: K, right: Handle) -> usize
    where
        K: Ord,
    {
        let index = self.keys.partition_point(|k| *k < key);
        self.keys.insert(index, key);
        self.children.insert(index + 1, right);
        index
    }

    /// Splits this node at the midpoint. Returns (`median_key`, `new_node`).
    ///
    /// The median moves up and is kept by neither half; the new node holds
    /// `keys[mid + 1..]` and `children[mid + 1..]` and inherits this node's parent.
    pub(crate) fn split(&mut self) -> (K, InternalNode<K>) {
        let mid = self.keys.len() / 2;

        let keys = self.keys.split_off(mid + 1);
        let children = self.children.split_off(mid + 1);
        let median = self.keys.pop().expect("`InternalNode::split()` - node has no median key!");

        assert!(
            !self.keys.is_empty() && !keys.is_empty(),
            "`InternalNode::split()` - split produced an empty node!"
        );

        let right = InternalNode {
            parent: self.parent,
            keys,
            children,
        };
        (median, right)
    }
}

impl<K, R> LeafNode<K, R> {
    /// Creates a new empty leaf node.
    pub(crate) const fn new() -> Self {
        Self {
            parent: None,
            next: None,
            keys: Vec::new(),
            records: Vec::new(),
        }
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn next(&self) -> Option<Handle> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<Handle>) {
        self.next = next;
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn records(&self, index: usize) -> &[R] {
        &self.records[index]
    }

    pub(crate) fn all_records(&self) -> &[Records<R>] {
        &self.records
    }

    /// Searches for a key in this leaf.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::NotFound(idx),
        }
    }

    /// Appends a record to the existing slot at `index`.
    pub(crate) fn push_record(&mut self, index: usize, record: R) {
        self.records[index].push(record);
    }

    /// Opens a new slot for `key` at `index` holding just `record`.
    pub(crate) fn insert(&mut self, index: usize, key: K, record: R) {
        let mut records = Records::new();
        records.push(record);
        self.keys.insert(index, key);
        self.records.insert(index, records);
    }

    /// Splits this leaf at the midpoint. Returns (`separator`, `new_node`).
    ///
    /// The new node takes `keys[mid..]` and is spliced into the chain right
    /// after this one. The separator is a copy of its first key.
    pub(crate) fn split(&mut self) -> (K, LeafNode<K, R>)
    where
        K: Clone,
    {
        let mid = self.keys.len() / 2;

        let right = LeafNode {
            parent: self.parent,
            next: self.next,
            keys: self.keys.split_off(mid),
            records: self.records.split_off(mid),
        };

        assert!(
            !self.keys.is_empty() && !right.keys.is_empty(),
            "`LeafNode::split()` - split produced an empty node!"
        );

        let separator = right.keys[0].clone();
        (separator, right)
    }
}
