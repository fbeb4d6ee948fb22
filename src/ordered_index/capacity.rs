use super::OrderedIndex;
use crate::Order;
use crate::raw::RawOrderedIndex;

impl<K, R> OrderedIndex<K, R> {
    /// Creates an empty index with node storage reserved for at least
    /// `capacity / order` nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::{Order, OrderedIndex};
    ///
    /// let index: OrderedIndex<i32, i32> = OrderedIndex::with_capacity(Order::DEFAULT, 64);
    /// assert!(index.is_empty());
    /// assert!(index.capacity() >= 16);
    /// ```
    #[must_use]
    pub fn with_capacity(order: Order, capacity: usize) -> Self {
        OrderedIndex {
            raw: RawOrderedIndex::with_capacity(order, capacity),
        }
    }

    /// Returns the number of nodes the index can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of nodes allocated so far, leaves and internal nodes alike.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }
}
