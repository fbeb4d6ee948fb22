//! An in-memory B+tree index with duplicate-key accumulation.
//!
//! This crate provides [`OrderedIndex`], an ordered multimap: each key maps to
//! the list of records inserted under it, in insertion order.
//!
//! - [`insert`](OrderedIndex::insert) - Add a record under a key, appending if the key exists
//! - [`search`](OrderedIndex::search) - Get every record for a key, or `None`
//! - [`dump`](OrderedIndex::dump) - Render the tree shape for diagnostics
//!
//! # Example
//!
//! ```
//! use bplus_index::OrderedIndex;
//!
//! let mut index = OrderedIndex::new(4).unwrap();
//! for (key, record) in [(10, "a"), (20, "b"), (5, "c"), (6, "d"), (12, "e"), (30, "f"), (7, "g"), (17, "h")] {
//!     index.insert(key, record);
//! }
//!
//! // Eight distinct keys at order 4 cannot fit in one leaf.
//! assert!(index.height() >= 2);
//! assert_eq!(index.search(&6), Some(&["d"][..]));
//! assert_eq!(index.search(&42), None);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Multimap semantics** - Duplicate keys accumulate records instead of replacing them
//! - **Runtime order** - The maximum keys per node is chosen when the index is built
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to each other by index handles. Internal
//! nodes own their children; `parent` and leaf `next` links are plain handles
//! used only for navigation. An overflowing leaf splits in half and pushes a
//! copy of its right half's first key to the parent. An overflowing internal
//! node pushes its median key up and keeps it in neither half. Splits walk up
//! the parent links in a loop until an ancestor has room or a new root is made.
//!
//! Both lookups and inserts route a key equal to a separator into the right
//! subtree, so every inserted key is found by the same path that placed it.
//!
//! Removal is not supported, so nodes are never merged and a node may hold as
//! few as one key.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order;
mod raw;

pub mod ordered_index;

pub use error::IndexError;
pub use order::Order;
pub use ordered_index::OrderedIndex;
