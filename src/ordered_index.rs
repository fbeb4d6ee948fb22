use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Handle, RawOrderedIndex};
use crate::{IndexError, Order};

mod capacity;
mod dump;

pub use dump::Dump;

/// An in-memory ordered multimap based on a [B+Tree].
///
/// Keys must implement [`Ord`]. Each key maps to the list of records inserted
/// under it, in insertion order: inserting an existing key appends a record
/// and never creates a second entry for that key.
///
/// The maximum number of keys per node is the index's [`Order`], fixed at
/// construction. A node splits as soon as an insert pushes it past that many
/// keys; there is no removal, so nodes are never merged.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the [`Ord`] trait, changes while it is in the index. The
/// behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `OrderedIndex` that observed it and not result in undefined behavior.
///
/// The index performs no synchronization. Hosts that share one across threads
/// must serialize every call to [`insert`](OrderedIndex::insert) themselves.
///
/// # Examples
///
/// ```
/// use bplus_index::OrderedIndex;
///
/// let mut phones = OrderedIndex::new(4)?;
///
/// phones.insert("Milena", "+380000013");
/// phones.insert("Amelia", "+380000001");
/// phones.insert("Milena", "+380000099");
///
/// // Records for a key accumulate in insertion order.
/// assert_eq!(phones.search("Milena"), Some(&["+380000013", "+380000099"][..]));
/// assert_eq!(phones.search("Zoe"), None);
///
/// assert_eq!(phones.len(), 2);
/// assert_eq!(phones.record_count(), 3);
/// # Ok::<(), bplus_index::IndexError>(())
/// ```
///
/// [B+Tree]: https://en.wikipedia.org/wiki/B%2B_tree
pub struct OrderedIndex<K, R> {
    raw: RawOrderedIndex<K, R>,
}

/// An iterator over the keys of an `OrderedIndex` and their records.
///
/// This `struct` is created by the [`iter`] method on [`OrderedIndex`]. It
/// walks the leaf chain left to right, so keys come out in ascending order.
///
/// [`iter`]: OrderedIndex::iter
pub struct Iter<'a, K, R> {
    tree: &'a RawOrderedIndex<K, R>,
    leaf: Option<Handle>,
    index: usize,
    remaining: usize,
}

/// An iterator over the keys of an `OrderedIndex`.
///
/// This `struct` is created by the [`keys`] method on [`OrderedIndex`].
///
/// [`keys`]: OrderedIndex::keys
pub struct Keys<'a, K, R> {
    inner: Iter<'a, K, R>,
}

impl<K, R> OrderedIndex<K, R> {
    /// Makes a new, empty `OrderedIndex` whose nodes hold at most `order` keys.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidOrder`] if `order` is below [`Order::MIN`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::{IndexError, OrderedIndex};
    ///
    /// let index: OrderedIndex<u64, &str> = OrderedIndex::new(4).unwrap();
    /// assert!(index.is_empty());
    ///
    /// assert!(matches!(
    ///     OrderedIndex::<u64, &str>::new(1),
    ///     Err(IndexError::InvalidOrder { order: 1 })
    /// ));
    /// ```
    pub fn new(order: usize) -> Result<Self, IndexError> {
        Order::new(order).map(Self::with_order)
    }

    /// Makes a new, empty `OrderedIndex` with an already validated order.
    #[must_use]
    pub fn with_order(order: Order) -> Self {
        log::debug!("creating ordered index with order {order}");
        OrderedIndex {
            raw: RawOrderedIndex::new(order),
        }
    }

    /// Returns the order the index was built with.
    #[must_use]
    pub fn order(&self) -> Order {
        self.raw.order()
    }

    /// Returns the number of distinct keys in the index.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::default();
    /// index.insert(1, "a");
    /// index.insert(1, "b");
    /// assert_eq!(index.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if no key has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of records across all keys.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.raw.record_count()
    }

    /// Returns the number of levels in the tree, counting the leaves.
    ///
    /// A fresh index is a single leaf and has height 1. Height only grows,
    /// one level each time the root splits.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Gets an iterator over the keys and their records, in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(2).unwrap();
    /// for (key, record) in [(3, 'c'), (1, 'a'), (2, 'b'), (1, 'z')] {
    ///     index.insert(key, record);
    /// }
    ///
    /// let entries: Vec<_> = index.iter().collect();
    /// assert_eq!(entries, [(&1, &['a', 'z'][..]), (&2, &['b'][..]), (&3, &['c'][..])]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, R> {
        Iter {
            tree: &self.raw,
            leaf: Some(self.raw.first_leaf()),
            index: 0,
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the keys, in ascending order.
    pub fn keys(&self) -> Keys<'_, K, R> {
        Keys { inner: self.iter() }
    }

    /// Returns a [`Display`](fmt::Display) rendering of the tree's shape.
    ///
    /// Each node takes one line. Internal nodes print as `Node: [keys]`,
    /// leaves as `Leaf: [keys] [records]`, and children are indented two
    /// spaces below their parent. The format is meant for people, not parsers.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(2).unwrap();
    /// for key in 1..=3 {
    ///     index.insert(key, key * 10);
    /// }
    ///
    /// assert_eq!(
    ///     index.dump().to_string(),
    ///     "Node: [2]\n  Leaf: [1] [[10]]\n  Leaf: [2, 3] [[20], [30]]\n"
    /// );
    /// ```
    pub fn dump(&self) -> Dump<'_, K, R> {
        Dump::new(&self.raw)
    }
}

impl<K: Clone + Ord, R> OrderedIndex<K, R> {
    /// Inserts `record` under `key`.
    ///
    /// If `key` is already present, `record` is appended to its record list.
    /// Otherwise a new entry holding only `record` is created. Never fails.
    ///
    /// # Complexity
    ///
    /// O(log n) node visits, plus at most one split per level.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(4).unwrap();
    /// index.insert(10, "a");
    /// index.insert(10, "b");
    /// assert_eq!(index.search(&10), Some(&["a", "b"][..]));
    /// ```
    pub fn insert(&mut self, key: K, record: R) {
        self.raw.insert(key, record);
    }

    /// Returns every record inserted under `key`, oldest first, or `None` if
    /// the key was never inserted.
    ///
    /// The key may be any borrowed form of the index's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::OrderedIndex;
    ///
    /// let mut index: OrderedIndex<String, u32> = OrderedIndex::default();
    /// index.insert("Oscar".to_owned(), 15);
    /// assert_eq!(index.search("Oscar"), Some(&[15][..]));
    /// assert_eq!(index.search("Perry"), None);
    /// ```
    #[must_use]
    pub fn search<Q>(&self, key: &Q) -> Option<&[R]>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns `true` if the index holds at least one record for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }
}

impl<K, R> Default for OrderedIndex<K, R> {
    /// Creates an empty index with [`Order::DEFAULT`].
    fn default() -> Self {
        OrderedIndex::with_order(Order::DEFAULT)
    }
}

impl<K: Clone, R: Clone> Clone for OrderedIndex<K, R> {
    fn clone(&self) -> Self {
        OrderedIndex { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug, R: fmt::Debug> fmt::Debug for OrderedIndex<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Clone + Ord, R> Extend<(K, R)> for OrderedIndex<K, R> {
    fn extend<T: IntoIterator<Item = (K, R)>>(&mut self, iter: T) {
        for (key, record) in iter {
            self.insert(key, record);
        }
    }
}

impl<'a, K, R> IntoIterator for &'a OrderedIndex<K, R> {
    type Item = (&'a K, &'a [R]);
    type IntoIter = Iter<'a, K, R>;

    fn into_iter(self) -> Iter<'a, K, R> {
        self.iter()
    }
}

impl<'a, K: 'a, R: 'a> Iterator for Iter<'a, K, R> {
    type Item = (&'a K, &'a [R]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        loop {
            let leaf = self.tree.node(self.leaf?).as_leaf();
            if self.index < leaf.key_count() {
                let index = self.index;
                self.index += 1;
                self.remaining -= 1;
                return Some((leaf.key(index), leaf.records(index)));
            }
            self.leaf = leaf.next();
            self.index = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, R> ExactSizeIterator for Iter<'_, K, R> {}

impl<K, R> FusedIterator for Iter<'_, K, R> {}

impl<K, R> Clone for Iter<'_, K, R> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            leaf: self.leaf,
            index: self.index,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, R: fmt::Debug> fmt::Debug for Iter<'_, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K: 'a, R: 'a> Iterator for Keys<'a, K, R> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, R> ExactSizeIterator for Keys<'_, K, R> {}

impl<K, R> FusedIterator for Keys<'_, K, R> {}

impl<K, R> Clone for Keys<'_, K, R> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, R> fmt::Debug for Keys<'_, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
