use core::fmt;
use core::num::NonZero;

use crate::IndexError;

/// The maximum number of keys a node holds before it splits.
///
/// An order is fixed when an index is built and is always at least
/// [`Order::MIN`].
///
/// # Examples
///
/// ```
/// use bplus_index::{IndexError, Order};
///
/// let order = Order::new(8).unwrap();
/// assert_eq!(order.get(), 8);
///
/// assert_eq!(Order::new(1), Err(IndexError::InvalidOrder { order: 1 }));
/// assert_eq!(Order::default(), Order::DEFAULT);
/// ```
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Order(NonZero<usize>);

impl Order {
    /// The smallest order that still splits into two non-empty halves.
    pub const MIN: usize = 2;

    /// Four keys per node.
    pub const DEFAULT: Self = match Self::new(4) {
        Ok(order) => order,
        Err(_) => panic!("default order is valid"),
    };

    /// Validates `order`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidOrder`] if `order < Order::MIN`.
    pub const fn new(order: usize) -> Result<Self, IndexError> {
        if order < Self::MIN {
            return Err(IndexError::InvalidOrder { order });
        }
        match NonZero::new(order) {
            Some(order) => Ok(Self(order)),
            None => Err(IndexError::InvalidOrder { order }),
        }
    }

    /// Returns the order as a plain number.
    #[must_use]
    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for Order {
    type Error = IndexError;

    fn try_from(order: usize) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<Order> for usize {
    fn from(order: Order) -> Self {
        order.get()
    }
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Order").field(&self.get()).finish()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.get(), f)
    }
}
