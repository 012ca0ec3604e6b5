//------------ NodeId --------------------------------------------------------

/// A handle to a node in a [Tree](crate::Tree). Ids are only meaningful for
/// the tree that handed them out, and stay valid for its whole lifetime,
/// since nodes are never removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//------------ Node ----------------------------------------------------------

// A vertex in the binary trie. A node does not know which block it
// represents: that follows from its position, i.e. the path of left (0) and
// right (1) turns from the root, and the depth of that path. Both are
// calculated by the tree by following the parent links upwards.
//
// The children are owned by this node (they hang off it in the tree). The
// parent link is only used to find the way back up.
/// A single node in the trie, see [Tree](crate::Tree) for the methods that
/// need to follow links between nodes.
#[derive(Clone, Debug)]
pub struct Node<D> {
    data: Option<D>,
    used: bool,
    // set by an explicit insert, never for scaffolding.
    inserted: bool,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<D> Node<D> {
    pub(crate) fn new(data: Option<D>) -> Self {
        Node {
            data,
            used: false,
            inserted: false,
            left: None,
            right: None,
            parent: None,
        }
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut D> {
        self.data.as_mut()
    }

    /// Replace the payload, returning the old one.
    pub fn set_data(&mut self, data: impl Into<Option<D>>) -> Option<D> {
        std::mem::replace(&mut self.data, data.into())
    }

    pub fn take_data(&mut self) -> Option<D> {
        self.data.take()
    }

    /// Whether the entire block of this node is allocated. Note that a
    /// block can also be unavailable because an ancestor is used.
    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn set_used(&mut self, used: bool) {
        self.used = used;
    }

    /// Whether this node was explicitly inserted, as opposed to created on
    /// the way to a deeper prefix.
    pub fn is_inserted(&self) -> bool {
        self.inserted
    }

    pub(crate) fn set_inserted(&mut self) {
        self.inserted = true;
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn child(&self, bit: u8) -> Option<NodeId> {
        if bit == 0 {
            self.left
        } else {
            self.right
        }
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = NodeId> {
        self.left.into_iter().chain(self.right)
    }
}
