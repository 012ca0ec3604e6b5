//------------ Types for Statistics -----------------------------------------

use std::fmt::{Debug, Display};

use serde_derive::Serialize;

use crate::types::bit_path::MAX_LEN;

/// A snapshot of the shape of a [Tree](crate::Tree), counting only the
/// nodes reachable from its root.
#[derive(Clone, Serialize)]
pub struct TreeStats {
    /// Number of nodes at each depth level, i.e. prefix length, including
    /// scaffold nodes.
    pub created_nodes: Vec<CreatedNodes>,
    /// Number of nodes that were explicitly inserted.
    pub inserted: usize,
    /// Number of nodes carrying the used flag, also the ones marked by
    /// propagation.
    pub used: usize,
}

impl TreeStats {
    pub(crate) fn new() -> Self {
        Self {
            created_nodes: (0..=MAX_LEN)
                .map(|depth_level| CreatedNodes {
                    depth_level,
                    count: 0,
                })
                .collect(),
            inserted: 0,
            used: 0,
        }
    }

    pub(crate) fn inc(&mut self, depth_level: u8) {
        if let Some(n) = self.created_nodes.get_mut(depth_level as usize) {
            n.count += 1
        }
    }

    /// Total number of reachable nodes.
    pub fn nodes(&self) -> usize {
        self.created_nodes.iter().fold(0, |mut acc, c| {
            acc += c.count;
            acc
        })
    }
}

impl Debug for TreeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nodes:{:>8?} {:?} inserted: {} used: {}",
            self.nodes(),
            self.created_nodes
                .iter()
                .filter(|n| n.count > 0)
                .collect::<Vec<_>>(),
            self.inserted,
            self.used
        )
    }
}

impl Display for TreeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "nodes    :\t{}", self.nodes())?;
        writeln!(f, "inserted :\t{}", self.inserted)?;
        writeln!(f, "used     :\t{}", self.used)?;
        for n in self.created_nodes.iter().filter(|n| n.count > 0) {
            writeln!(f, "{:?}", n)?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Serialize)]
pub struct CreatedNodes {
    pub depth_level: u8,
    pub count: usize,
}

impl Debug for CreatedNodes {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_fmt(format_args!("/{}: {}", &self.depth_level, &self.count))
    }
}
