#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

//! A binary trie over the IPv4 address space that keeps track of allocated
//! address blocks, and finds free ones.
//!
//! Every level of the trie stands for one bit of an address, so every node
//! is exactly one CIDR block. Inserting a prefix marks its block as used
//! (allocated); when both halves of a block are used, the block itself is
//! marked used as well. The tree can then answer the question "what is the
//! lowest block of size /n that is still free", in the whole address space
//! or inside a given block, much like a buddy allocator that hands out CIDR
//! blocks instead of memory pages.
//!
//! ```
//! use prefix_gaptree::{InsertOptions, Tree};
//!
//! let mut tree = Tree::new();
//! let opts = InsertOptions::default();
//!
//! tree.insert("10.0.0.0/9", "lab", opts)?;
//! tree.insert("10.128.0.0/9", "office", opts)?;
//!
//! // Both halves are allocated, so the /8 is used as a whole.
//! let top: Vec<String> = tree
//!     .iterate_nodes(None, true)?
//!     .map(|c| c.to_string())
//!     .collect();
//! assert_eq!(top, ["10.0.0.0/8"]);
//!
//! let gap = tree.find_gap_from("10.0.0.0/8", 24)?;
//! assert_eq!(gap, None);
//! assert_eq!(tree.find_gap(8)?.map(|c| c.to_string()), Some("0.0.0.0/8".into()));
//! # Ok::<(), prefix_gaptree::errors::PrefixTreeError>(())
//! ```
//!
//! Only IPv4 is supported. The tree is single-threaded: mutation takes
//! `&mut self`.
mod tree;
mod types;

// Public Interfaces on the root of the crate

/// The trie, its nodes and the result of an insert
pub use tree::{InsertResult, Node, NodeId, Tree};

/// Iterators returned by a Tree
pub use tree::{PrefixRangeIter, UsedPrefixIter};

/// Options for inserting into a Tree
pub use tree::config::InsertOptions;

/// The IPv4 block type and the bit path codec
pub use types::{path_to_dot_quad, BitPath, Cidr};

/// Error types returned by a Tree
pub use types::errors;

/// Statistics types returned by a Tree
pub use types::stats;
