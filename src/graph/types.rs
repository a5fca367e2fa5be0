//! Core type definitions for the walk graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense node identifier: the node's insertion position in the graph.
///
/// Matches the row index of the node in the extracted CSR adjacency and the
/// values stored in walk batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}

/// Whether edges are one-way or stored in both directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Directed,
    #[default]
    Undirected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(7);
        assert_eq!(id.as_u32(), 7);
        assert_eq!(id.index(), 7);
        assert_eq!(format!("{}", id), "NodeId(7)");
        assert_eq!(NodeId::from(7), id);
    }
}
