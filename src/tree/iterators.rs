// ----------- Tree Iterators -----------------------------------------------
//
// This file hosts the iterators over a Tree and the methods that start'em.
// There are 2 Iterators:
//
// 1. `UsedPrefixIter` walks the trie depth-first, lower half first, from the
// root or from a given node, and yields the blocks of the used nodes it
// meets, optionally without descending into used nodes.
//
// 2. `PrefixRangeIter` does not look at the trie at all: it counts through
// all the blocks of one prefix length.
//
// Both yield their blocks in ascending order.

use std::str::FromStr;

use log::trace;

use super::{NodeId, Tree};
use crate::types::bit_path::MAX_LEN;
use crate::types::errors::PrefixTreeError;
use crate::types::Cidr;

// ----------- UsedPrefixIter -----------------------------------------------

/// An iterator over the blocks of the used nodes in (part of) a tree, see
/// [Tree::iterate_nodes].
pub struct UsedPrefixIter<'a, D> {
    tree: &'a Tree<D>,
    // Nodes still to visit, together with the block they stand for. The
    // upper half is pushed before the lower half, so that the lower half is
    // visited first.
    stack: Vec<(NodeId, Cidr)>,
    top_used: bool,
}

impl<'a, D> UsedPrefixIter<'a, D> {
    fn new(
        tree: &'a Tree<D>,
        start: Option<(NodeId, Cidr)>,
        top_used: bool,
    ) -> Self {
        UsedPrefixIter {
            tree,
            stack: start.into_iter().collect(),
            top_used,
        }
    }
}

impl<D> Iterator for UsedPrefixIter<'_, D> {
    type Item = Cidr;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, block)) = self.stack.pop() {
            let node = self.tree.at(id);

            // Everything below a used node is part of its block already.
            if !(node.is_used() && self.top_used) {
                if let (Some(right), Some(half)) =
                    (node.right(), block.right_half())
                {
                    self.stack.push((right, half));
                }
                if let (Some(left), Some(half)) =
                    (node.left(), block.left_half())
                {
                    self.stack.push((left, half));
                }
            }

            if node.is_used() {
                trace!("used {}", block);
                return Some(block);
            }
        }
        None
    }
}

// ----------- PrefixRangeIter ----------------------------------------------

/// An iterator over all `2^len` blocks of one prefix length, lowest first,
/// see [Tree::generate_for_prefix].
///
/// ```
/// use prefix_gaptree::PrefixRangeIter;
///
/// let blocks: Vec<String> = PrefixRangeIter::new(2)?
///     .map(|c| c.to_string())
///     .collect();
/// assert_eq!(
///     blocks,
///     ["0.0.0.0/2", "64.0.0.0/2", "128.0.0.0/2", "192.0.0.0/2"]
/// );
/// # Ok::<(), prefix_gaptree::errors::PrefixTreeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PrefixRangeIter {
    cursor: u64,
    end: u64,
    len: u8,
}

impl PrefixRangeIter {
    pub fn new(len: u8) -> Result<Self, PrefixTreeError> {
        if len > MAX_LEN {
            return Err(PrefixTreeError::PrefixLengthInvalid(len));
        }
        Ok(PrefixRangeIter {
            cursor: 0,
            end: 1 << len,
            len,
        })
    }
}

impl Iterator for PrefixRangeIter {
    type Item = Cidr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let net = (self.cursor << (MAX_LEN - self.len)) as u32;
        self.cursor += 1;
        Some(Cidr::from_raw(net, self.len))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.cursor;
        (
            usize::try_from(remaining).unwrap_or(usize::MAX),
            usize::try_from(remaining).ok(),
        )
    }
}

// ----------- Iterator starters --------------------------------------------

impl<D> Tree<D> {
    /// Iterate over the blocks of used nodes, in ascending order, under
    /// `prefix` (the block itself included) or in the whole tree if
    /// `prefix` is `None`. If `prefix` has no node in the tree, the
    /// iterator is empty.
    ///
    /// With `top_used` set, the iterator does not descend into used nodes,
    /// so it only yields the largest used blocks: no yielded block lies
    /// inside another one.
    ///
    /// Nodes above `prefix` are not looked at. If a block that covers
    /// `prefix` is used, the used blocks under `prefix` are still yielded,
    /// even with `top_used` set. Use [is_free](Self::is_free) or
    /// [top_used_prefixes](Self::top_used_prefixes) to see the block that
    /// covers them.
    pub fn iterate_nodes(
        &self,
        prefix: Option<&str>,
        top_used: bool,
    ) -> Result<UsedPrefixIter<'_, D>, PrefixTreeError> {
        let start = match prefix {
            Some(prefix) => {
                let cidr = Cidr::from_str(prefix)?;
                self.find_node(cidr).map(|id| (id, cidr))
            }
            None => Some((self.root(), Cidr::default_route())),
        };
        Ok(UsedPrefixIter::new(self, start, top_used))
    }

    /// All used blocks in the tree, see [iterate_nodes](Self::iterate_nodes).
    pub fn used_prefixes(&self) -> UsedPrefixIter<'_, D> {
        UsedPrefixIter::new(
            self,
            Some((self.root(), Cidr::default_route())),
            false,
        )
    }

    /// The largest used blocks in the tree, see
    /// [iterate_nodes](Self::iterate_nodes).
    pub fn top_used_prefixes(&self) -> UsedPrefixIter<'_, D> {
        UsedPrefixIter::new(
            self,
            Some((self.root(), Cidr::default_route())),
            true,
        )
    }

    /// All `2^len` blocks of length `len`, lowest first. This does not
    /// depend on the contents of the tree.
    pub fn generate_for_prefix(
        &self,
        len: u8,
    ) -> Result<PrefixRangeIter, PrefixTreeError> {
        PrefixRangeIter::new(len)
    }
}
