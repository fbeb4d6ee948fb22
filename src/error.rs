use thiserror::Error;

/// Errors reported when configuring an [`OrderedIndex`](crate::OrderedIndex).
///
/// Lookups never fail: a missing key is reported as `None` by
/// [`OrderedIndex::search`](crate::OrderedIndex::search).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum IndexError {
    /// The requested order is below [`Order::MIN`](crate::Order::MIN).
    ///
    /// An order of 0 or 1 would split a node into an empty half.
    #[error("invalid order {order}: an index needs at least 2 keys per node")]
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },
}
