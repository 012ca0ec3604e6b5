// ----------- Gap search ---------------------------------------------------
//
// A gap is a block that is entirely free: it is not used, it does not lie
// inside a used block, and no used block lies inside it.
//
// The search walks the trie depth-first, lower half first, so the first gap
// found is the lowest one. Two things keep it cheap:
//
// - a used node cuts off its whole subtree, without looking at it;
// - a missing node means that nothing was ever inserted in that block, so
//   the first sub-block of the requested size in there is free, right away.
//
// Only at the requested depth does the search have to look below a node, to
// make sure it holds no used blocks. So as long as there is plenty of free
// space a gap turns up after a handful of steps, and the search only gets
// expensive when the space is almost exhausted.

use std::str::FromStr;

use log::{debug, trace};

use super::config::InsertOptions;
use super::{NodeId, Tree};
use crate::types::bit_path::MAX_LEN;
use crate::types::errors::PrefixTreeError;
use crate::types::Cidr;

impl<D> Tree<D> {
    /// Find the lowest block of length `prefix_len` in the whole address
    /// space that is entirely free. Returns `None` when there is none left.
    pub fn find_gap(
        &self,
        prefix_len: u8,
    ) -> Result<Option<Cidr>, PrefixTreeError> {
        check_len(prefix_len)?;
        Ok(self.first_free(
            Some(self.root()),
            Cidr::default_route(),
            prefix_len,
        ))
    }

    /// Find the lowest free block of length `prefix_len` inside the block
    /// `start`.
    ///
    /// Returns `None` if `prefix_len` is shorter than the length of
    /// `start`, if `start` has no node in the tree, if `start` is used or
    /// lies in a used block, or if there is no free block left in there.
    /// With `prefix_len` equal to the length of `start`, this returns
    /// `start` if it is free.
    pub fn find_gap_from(
        &self,
        start: &str,
        prefix_len: u8,
    ) -> Result<Option<Cidr>, PrefixTreeError> {
        let start = Cidr::from_str(start)?;
        self.find_gap_from_cidr(start, prefix_len)
    }

    /// Like [find_gap_from](Self::find_gap_from) for an already parsed
    /// prefix.
    pub fn find_gap_from_cidr(
        &self,
        start: Cidr,
        prefix_len: u8,
    ) -> Result<Option<Cidr>, PrefixTreeError> {
        check_len(prefix_len)?;
        if prefix_len < start.len() {
            return Ok(None);
        }
        let Some(id) = self.find_node(start) else {
            trace!("no node for {}, no gap", start);
            return Ok(None);
        };
        if self.is_covered(id) {
            trace!("{} is used, no gap", start);
            return Ok(None);
        }
        Ok(self.first_free(Some(id), start, prefix_len))
    }

    /// Find the lowest free block of length `prefix_len` and insert it as
    /// used, storing `data`. Returns the block, or `None` if there is no
    /// free block of that length left.
    ///
    /// A free block may have been inserted before without being marked
    /// used, e.g. as a pool to search in. Such a block is claimed: it is
    /// marked used and its payload is replaced by `data`. Of `options`
    /// only `propagate_used` applies.
    pub fn allocate(
        &mut self,
        prefix_len: u8,
        data: impl Into<Option<D>>,
        options: InsertOptions,
    ) -> Result<Option<Cidr>, PrefixTreeError> {
        let Some(gap) = self.find_gap(prefix_len)? else {
            return Ok(None);
        };
        let options = options.with_mark_used(true).with_test_dup(false);
        let res = self.insert_cidr(gap, data, options);
        debug!("allocated {} at {:?}", gap, res.node());
        Ok(Some(gap))
    }

    // The lowest free block of length `target` inside `block`, with `node`
    // being the node for `block`, if it exists. The depth of the recursion
    // is bounded by the 32 bits of an address.
    fn first_free(
        &self,
        node: Option<NodeId>,
        block: Cidr,
        target: u8,
    ) -> Option<Cidr> {
        let Some(id) = node else {
            return block.first_subnet(target);
        };

        let node = self.at(id);
        if node.is_used() {
            trace!("skip used {}", block);
            return None;
        }

        if block.len() == target {
            if self.contains_used(id) {
                trace!("{} holds used blocks", block);
                return None;
            }
            return Some(block);
        }

        let (left, right) = (node.left(), node.right());
        block
            .left_half()
            .and_then(|half| self.first_free(left, half, target))
            .or_else(|| {
                block
                    .right_half()
                    .and_then(|half| self.first_free(right, half, target))
            })
    }
}

fn check_len(prefix_len: u8) -> Result<(), PrefixTreeError> {
    if prefix_len > MAX_LEN {
        return Err(PrefixTreeError::PrefixLengthInvalid(prefix_len));
    }
    Ok(())
}
