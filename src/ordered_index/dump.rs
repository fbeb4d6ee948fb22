use core::fmt;

use smallvec::SmallVec;

use crate::raw::{Handle, Node, RawOrderedIndex};

const INDENT: &str = "  ";

/// A human-readable rendering of an index's tree shape.
///
/// This `struct` is created by the [`dump`](super::OrderedIndex::dump) method
/// on [`OrderedIndex`](super::OrderedIndex). Nodes are written depth-first,
/// left to right.
pub struct Dump<'a, K, R> {
    tree: &'a RawOrderedIndex<K, R>,
}

impl<'a, K, R> Dump<'a, K, R> {
    pub(super) fn new(tree: &'a RawOrderedIndex<K, R>) -> Self {
        Dump { tree }
    }
}

impl<K: fmt::Debug, R: fmt::Debug> fmt::Display for Dump<'_, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: SmallVec<[(Handle, usize); 16]> = SmallVec::new();
        stack.push((self.tree.root(), 0));

        while let Some((handle, depth)) = stack.pop() {
            for _ in 0..depth {
                f.write_str(INDENT)?;
            }
            match self.tree.node(handle) {
                Node::Leaf(leaf) => writeln!(f, "Leaf: {:?} {:?}", leaf.keys(), leaf.all_records())?,
                Node::Internal(internal) => {
                    writeln!(f, "Node: {:?}", internal.keys())?;
                    // Reversed so the leftmost child is popped first.
                    for &child in internal.children().iter().rev() {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }

        Ok(())
    }
}

impl<K: fmt::Debug, R: fmt::Debug> fmt::Debug for Dump<'_, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
