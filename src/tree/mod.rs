//! The binary prefix trie and everything that walks it.
//!
//! Each level of the trie consumes one bit of an IPv4 address, so a node at
//! depth `n` stands for exactly one block with prefix length `n`, its left
//! child for the lower half of that block and its right child for the
//! upper half. The trie is sparse: only nodes on the way to an inserted
//! prefix exist.
//!
//! A node marked "used" has its entire block allocated. Gap searches look
//! for blocks that are entirely free, i.e. not used, not below a used node
//! and with no used nodes below them.
//!
//! All nodes are kept in a flat arena owned by the [Tree], and are
//! addressed by [NodeId]. Parent links are plain ids as well, so they
//! cannot keep anything alive.

pub mod config;
mod gap;
mod iterators;
mod node;

pub use iterators::{PrefixRangeIter, UsedPrefixIter};
pub use node::{Node, NodeId};

use std::str::FromStr;

use log::{debug, trace};

use crate::types::bit_path::MAX_LEN;
use crate::types::errors::PrefixTreeError;
use crate::types::stats::TreeStats;
use crate::types::{BitPath, Cidr};
use config::InsertOptions;

//------------ InsertResult --------------------------------------------------

/// The outcome of an [insert](Tree::insert).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertResult {
    /// The prefix was stored at this node.
    Inserted(NodeId),
    /// The prefix was inserted before and duplicates were refused. The
    /// tree is unchanged.
    DuplicateInsert,
}

impl InsertResult {
    /// The node the prefix was stored at, `None` for a refused duplicate.
    pub fn node(self) -> Option<NodeId> {
        match self {
            InsertResult::Inserted(id) => Some(id),
            InsertResult::DuplicateInsert => None,
        }
    }

    pub fn is_duplicate(self) -> bool {
        self == InsertResult::DuplicateInsert
    }
}

//------------ Tree ----------------------------------------------------------

/// A binary trie over the IPv4 address space, holding an optional payload
/// of type `D` per node.
///
/// ```
/// use prefix_gaptree::{InsertOptions, Tree};
///
/// let mut tree = Tree::new();
/// tree.insert("0.0.0.0/8", "reason1", InsertOptions::default())?;
/// tree.insert("1.0.0.0/8", "reason2", InsertOptions::default())?;
///
/// let gap = tree.find_gap(8)?;
/// assert_eq!(gap.map(|c| c.to_string()), Some("2.0.0.0/8".to_string()));
/// # Ok::<(), prefix_gaptree::errors::PrefixTreeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Tree<D> {
    nodes: Vec<Node<D>>,
    root: NodeId,
}

impl<D> Tree<D> {
    /// Create a tree holding only the (unused) root, `0.0.0.0/0`.
    pub fn new() -> Self {
        Tree {
            nodes: vec![Node::new(None)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<D>> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<D>> {
        self.nodes.get_mut(id.index())
    }

    // Ids are only created by this tree and nodes are never removed, so
    // an id that we hand out ourselves always indexes into the arena.
    #[allow(clippy::indexing_slicing)]
    fn at(&self, id: NodeId) -> &Node<D> {
        &self.nodes[id.index()]
    }

    #[allow(clippy::indexing_slicing)]
    fn at_mut(&mut self, id: NodeId) -> &mut Node<D> {
        &mut self.nodes[id.index()]
    }

    fn checked(&self, id: NodeId) -> Result<&Node<D>, PrefixTreeError> {
        self.node(id).ok_or(PrefixTreeError::NodeNotFound)
    }

    fn push_node(&mut self, node: Node<D>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a node that is not (yet) linked into the tree. Link it with
    /// [set_left](Self::set_left) or [set_right](Self::set_right).
    pub fn new_node(&mut self, data: impl Into<Option<D>>) -> NodeId {
        self.push_node(Node::new(data.into()))
    }

    // ------- Structure -----------------------------------------------------

    /// Make `child` the left child of `parent`, replacing (and detaching)
    /// the current left child, if any. Passing `None` only detaches.
    pub fn set_left(
        &mut self,
        parent: NodeId,
        child: Option<NodeId>,
    ) -> Result<(), PrefixTreeError> {
        self.set_child(parent, 0, child)
    }

    /// Make `child` the right child of `parent`, see
    /// [set_left](Self::set_left).
    pub fn set_right(
        &mut self,
        parent: NodeId,
        child: Option<NodeId>,
    ) -> Result<(), PrefixTreeError> {
        self.set_child(parent, 1, child)
    }

    fn set_child(
        &mut self,
        parent: NodeId,
        bit: u8,
        child: Option<NodeId>,
    ) -> Result<(), PrefixTreeError> {
        self.checked(parent)?;
        if let Some(child) = child {
            self.checked(child)?;
            // The child may not be the parent itself, or above it.
            if self.ancestors_and_self(parent).any(|a| a == child) {
                return Err(PrefixTreeError::InvalidLink);
            }
            // Nor may its subtree end up deeper than an address is long.
            let depth = self.level(parent)? as usize + 1 + self.height(child);
            if depth > MAX_LEN as usize {
                debug!("refusing link, subtree would reach depth {}", depth);
                return Err(PrefixTreeError::InvalidLink);
            }
            // Move the child away from its current spot, if any.
            if let Some(old_parent) = self.at(child).parent {
                let old = self.at_mut(old_parent);
                if old.left == Some(child) {
                    old.left = None;
                }
                if old.right == Some(child) {
                    old.right = None;
                }
            }
        }

        let slot = match bit {
            0 => &mut self.at_mut(parent).left,
            _ => &mut self.at_mut(parent).right,
        };
        let replaced = std::mem::replace(slot, child);

        if let Some(replaced) = replaced.filter(|r| Some(*r) != child) {
            self.at_mut(replaced).parent = None;
        }
        if let Some(child) = child {
            self.at_mut(child).parent = Some(parent);
        }
        Ok(())
    }

    /// Set the parent link of `child` only. The parent does not take
    /// ownership of the child, use [set_left](Self::set_left) or
    /// [set_right](Self::set_right) for that. If `child` hung below
    /// another node, it is detached from there.
    ///
    /// Until a parent owns the child, the link does not count for the
    /// child's [level](Self::level), [path](Self::path) or
    /// [cidr](Self::cidr).
    pub fn set_parent(
        &mut self,
        child: NodeId,
        parent: Option<NodeId>,
    ) -> Result<(), PrefixTreeError> {
        self.checked(child)?;
        if let Some(parent) = parent {
            self.checked(parent)?;
            if self.ancestors_and_self(parent).any(|a| a == child) {
                return Err(PrefixTreeError::InvalidLink);
            }
        }
        if let Some(owner) = self.owner(child).filter(|o| Some(*o) != parent) {
            let old = self.at_mut(owner);
            if old.left == Some(child) {
                old.left = None;
            }
            if old.right == Some(child) {
                old.right = None;
            }
        }
        self.at_mut(child).parent = parent;
        Ok(())
    }

    // The node itself followed by all its ancestors, up to the root,
    // following every parent link.
    fn ancestors_and_self(
        &self,
        id: NodeId,
    ) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |cur| {
            self.node(*cur).and_then(|n| n.parent)
        })
    }

    // The parent of `id`, if that parent has `id` as one of its children.
    fn owner(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id)?.parent?;
        self.node(parent)?.children().any(|c| c == id).then_some(parent)
    }

    // The node itself followed by the chain of nodes that own it.
    fn lineage(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |cur| self.owner(*cur))
    }

    // The number of levels below `id`, 0 for a leaf.
    fn height(&self, id: NodeId) -> usize {
        let mut height = 0;
        let mut stack = vec![(id, 0_usize)];
        while let Some((cur, depth)) = stack.pop() {
            height = height.max(depth);
            if let Some(node) = self.node(cur) {
                stack.extend(node.children().map(|c| (c, depth + 1)));
            }
        }
        height
    }

    /// The depth of the node, which is the prefix length of its block. The
    /// root is at level 0. Only links from parents that own their child
    /// count.
    pub fn level(&self, id: NodeId) -> Result<u8, PrefixTreeError> {
        self.checked(id)?;
        let level = self.lineage(id).count() - 1;
        u8::try_from(level)
            .ok()
            .filter(|l| *l <= MAX_LEN)
            .ok_or(PrefixTreeError::InvalidLink)
    }

    /// Whether this node has no parent.
    pub fn am_root(&self, id: NodeId) -> Result<bool, PrefixTreeError> {
        Ok(self.checked(id)?.parent.is_none())
    }

    /// Whether this node is the left child of its parent.
    pub fn am_left(&self, id: NodeId) -> Result<bool, PrefixTreeError> {
        Ok(self.binary(id)? == Some(0))
    }

    /// Whether this node is the right child of its parent.
    pub fn am_right(&self, id: NodeId) -> Result<bool, PrefixTreeError> {
        Ok(self.binary(id)? == Some(1))
    }

    /// The turn that leads from the parent to this node: `Some(0)` for a
    /// left child, `Some(1)` for a right child, `None` for the root (or a
    /// node whose parent does not own it).
    pub fn binary(&self, id: NodeId) -> Result<Option<u8>, PrefixTreeError> {
        let node = self.checked(id)?;
        Ok(node.parent.and_then(|p| {
            let parent = self.at(p);
            if parent.left == Some(id) {
                Some(0)
            } else if parent.right == Some(id) {
                Some(1)
            } else {
                None
            }
        }))
    }

    /// The turns from the root to this node, one per [level](Self::level).
    /// Empty for the root.
    pub fn path(&self, id: NodeId) -> Result<BitPath, PrefixTreeError> {
        self.checked(id)?;
        let mut turns = self
            .lineage(id)
            .filter_map(|cur| self.binary(cur).ok().flatten())
            .collect::<Vec<_>>();
        if turns.len() > MAX_LEN as usize {
            return Err(PrefixTreeError::InvalidLink);
        }
        turns.reverse();
        let mut path = BitPath::new();
        for bit in turns {
            path.push(bit);
        }
        Ok(path)
    }

    /// The block this node stands for.
    pub fn cidr(&self, id: NodeId) -> Result<Cidr, PrefixTreeError> {
        let path = self.path(id)?;
        path.to_cidr(path.len())
    }

    // ------- Insert & Lookup -----------------------------------------------

    /// Insert `prefix`, storing `data` at its node. See [InsertOptions] for
    /// the flags. The default route `0.0.0.0/0` is the root node itself.
    ///
    /// Returns [InsertResult::DuplicateInsert] if `test_dup` is set and the
    /// prefix was inserted before; nothing is changed then.
    pub fn insert(
        &mut self,
        prefix: &str,
        data: impl Into<Option<D>>,
        options: InsertOptions,
    ) -> Result<InsertResult, PrefixTreeError> {
        let cidr = Cidr::from_str(prefix)?;
        Ok(self.insert_cidr(cidr, data, options))
    }

    /// Like [insert](Self::insert) for an already parsed prefix.
    pub fn insert_cidr(
        &mut self,
        cidr: Cidr,
        data: impl Into<Option<D>>,
        options: InsertOptions,
    ) -> InsertResult {
        trace!("insert {} {:?}", cidr, options);
        let mut cur = self.root;
        for bit in cidr.bit_path().iter() {
            cur = self.child_or_create(cur, bit);
        }

        let node = self.at_mut(cur);
        if options.test_dup
            && node.is_inserted()
            && !(options.test_none && node.data().is_none())
        {
            debug!("refusing duplicate insert of {}", cidr);
            return InsertResult::DuplicateInsert;
        }

        node.set_data(data);
        node.set_inserted();
        if options.mark_used {
            node.set_used(true);
        }
        if options.propagate_used {
            self.check_recursively_used(cur);
        }
        InsertResult::Inserted(cur)
    }

    fn child_or_create(&mut self, parent: NodeId, bit: u8) -> NodeId {
        if let Some(child) = self.at(parent).child(bit) {
            return child;
        }
        let mut node = Node::new(None);
        node.parent = Some(parent);
        let id = self.push_node(node);
        if bit == 0 {
            self.at_mut(parent).left = Some(id);
        } else {
            self.at_mut(parent).right = Some(id);
        }
        id
    }

    // The node at exactly this block, inserted or scaffolding.
    pub(crate) fn find_node(&self, cidr: Cidr) -> Option<NodeId> {
        cidr.bit_path()
            .iter()
            .try_fold(self.root, |cur, bit| self.at(cur).child(bit))
    }

    /// Find the node for exactly `prefix`. Only nodes that were explicitly
    /// inserted (used or not) are returned, never nodes that were created
    /// on the way to a longer prefix.
    pub fn lookup(
        &self,
        prefix: &str,
    ) -> Result<Option<NodeId>, PrefixTreeError> {
        let cidr = Cidr::from_str(prefix)?;
        Ok(self.lookup_cidr(cidr))
    }

    /// Like [lookup](Self::lookup) for an already parsed prefix.
    pub fn lookup_cidr(&self, cidr: Cidr) -> Option<NodeId> {
        self.find_node(cidr).filter(|id| self.at(*id).is_inserted())
    }

    // ------- Used marking --------------------------------------------------

    /// Starting at `id`, walk upwards and mark every parent used whose two
    /// children are both used. Stops at the root or at the first parent
    /// that does not qualify.
    pub fn check_recursively_used(&mut self, id: NodeId) {
        let mut cur = id;
        while let Some(parent) = self.owner(cur) {
            let p = self.at(parent);
            let both_used = match (p.left, p.right) {
                (Some(l), Some(r)) => {
                    self.at(l).is_used() && self.at(r).is_used()
                }
                _ => false,
            };
            if !both_used {
                break;
            }
            trace!("both halves used, marking parent {} used", parent);
            self.at_mut(parent).set_used(true);
            cur = parent;
        }
    }

    // Whether the node or any of its ancestors is used.
    fn is_covered(&self, id: NodeId) -> bool {
        self.lineage(id).any(|a| self.at(a).is_used())
    }

    // Whether any node in the subtree of `id`, including itself, is used.
    fn contains_used(&self, id: NodeId) -> bool {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let node = self.at(cur);
            if node.is_used() {
                return true;
            }
            stack.extend(node.children());
        }
        false
    }

    /// Whether the whole block of `prefix` is available: it is not used,
    /// does not lie inside a used block, and has no used blocks inside it.
    pub fn is_free(&self, prefix: &str) -> Result<bool, PrefixTreeError> {
        let cidr = Cidr::from_str(prefix)?;
        Ok(self.is_free_cidr(cidr))
    }

    /// Like [is_free](Self::is_free) for an already parsed prefix.
    pub fn is_free_cidr(&self, cidr: Cidr) -> bool {
        let mut cur = self.root;
        for bit in cidr.bit_path().iter() {
            if self.at(cur).is_used() {
                return false;
            }
            match self.at(cur).child(bit) {
                Some(child) => cur = child,
                // nothing was ever put in here.
                None => return true,
            }
        }
        !self.contains_used(cur)
    }

    // ------- Statistics ----------------------------------------------------

    /// Count the nodes reachable from the root.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::new();
        let mut stack = vec![(self.root, 0_u8)];
        while let Some((id, level)) = stack.pop() {
            let node = self.at(id);
            stats.inc(level);
            if node.is_inserted() {
                stats.inserted += 1;
            }
            if node.is_used() {
                stats.used += 1;
            }
            stack.extend(node.children().map(|c| (c, level + 1)));
        }
        stats
    }
}

impl<D> Default for Tree<D> {
    fn default() -> Self {
        Self::new()
    }
}

// Two trees are the same when they have allocated the same address space,
// no matter at what granularity the allocations were recorded.
impl<D> PartialEq for Tree<D> {
    fn eq(&self, other: &Self) -> bool {
        self.top_used_prefixes().eq(other.top_used_prefixes())
    }
}

impl<D> Eq for Tree<D> {}
