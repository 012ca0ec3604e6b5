//! Options that steer a single [insert](crate::Tree::insert).
//!
//! The default has all flags set, which is what you want when recording
//! allocations:
//!
//! ```
//! use prefix_gaptree::{InsertOptions, Tree};
//!
//! let mut tree = Tree::<&str>::new();
//! tree.insert("10.0.0.0/8", "allocated", InsertOptions::default())?;
//!
//! // Only register the block, e.g. to search for gaps inside it later.
//! let opts = InsertOptions::default().with_mark_used(false);
//! tree.insert("172.16.0.0/12", "pool", opts)?;
//! # Ok::<(), prefix_gaptree::errors::PrefixTreeError>(())
//! ```

//------------ InsertOptions -------------------------------------------------

/// Flags for [Tree::insert](crate::Tree::insert).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InsertOptions {
    /// Mark the inserted block as used (allocated).
    pub mark_used: bool,
    /// After marking, mark ancestors used whose two halves are both used.
    pub propagate_used: bool,
    /// Refuse to insert a prefix that was inserted before.
    pub test_dup: bool,
    /// With `test_dup`, a previous insert that stored no payload does not
    /// count as a duplicate, and may be claimed.
    pub test_none: bool,
}

impl InsertOptions {
    pub fn with_mark_used(mut self, mark_used: bool) -> Self {
        self.mark_used = mark_used;
        self
    }

    pub fn with_propagate_used(mut self, propagate_used: bool) -> Self {
        self.propagate_used = propagate_used;
        self
    }

    pub fn with_test_dup(mut self, test_dup: bool) -> Self {
        self.test_dup = test_dup;
        self
    }

    pub fn with_test_none(mut self, test_none: bool) -> Self {
        self.test_none = test_none;
        self
    }
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            mark_used: true,
            propagate_used: true,
            test_dup: true,
            test_none: true,
        }
    }
}
