//! mlg-walker
//!
//! Random walks and walk corruption over attributed graphs, for
//! skip-gram style graph embedding and contrastive training.
//!
//! # Architecture
//!
//! - `mlg-walker-core` (workspace crate): CSR transition store, walk sampler
//!   (uniform, time-constrained, node2vec, restart), negative table and
//!   corruption engine. Pure, seeded, rayon-parallel.
//! - this crate: attributed [`graph::Graph`], adjacency extraction, and the
//!   `random_walks` / `corrupt` / `corrupted_random_walks` entry points with
//!   configuration and timing logs.
//!
//! # Features
//!
//! - ✅ Weighted first-order walks over row-normalized adjacency
//! - ✅ "No future" temporal walks gated by a node date attribute
//! - ✅ Node2vec second-order walks (return `p`, in-out `q`)
//! - ✅ Random walks with restart (`alpha`)
//! - ✅ Degree power-law negative table and per-position walk corruption
//! - ✅ Bit-reproducible output for a fixed seed, independent of thread count
//!
//! ## Example Usage
//!
//! ```rust
//! use mlg_walker::{random_walks, Graph, WalkOptions};
//!
//! let mut graph = Graph::undirected();
//! graph.add_weighted_edge("A", "B", 1.0).unwrap();
//! graph.add_weighted_edge("B", "C", 0.5).unwrap();
//! graph.add_weighted_edge("A", "C", 0.25).unwrap();
//!
//! let options = WalkOptions {
//!     n_walks: 2,
//!     walk_len: 5,
//!     seed: Some(42),
//!     verbose: false,
//!     ..Default::default()
//! };
//! let walks = random_walks(&graph, &options).unwrap();
//! assert_eq!(walks.shape(), &[3, 2, 5]);
//! ```

#![warn(clippy::all)]

pub mod adjacency;
pub mod config;
pub mod error;
pub mod graph;
pub mod walker;

// Re-export main types for convenience
pub use graph::{
    Direction, Graph, GraphError, GraphResult, Node, NodeId, PropertyMap, PropertyValue,
};

pub use config::{CorruptOptions, WalkOptions, WalkerConfig};

pub use error::{WalkerError, WalkerResult};

pub use walker::{
    corrupt, corrupted_random_walks, negative_table, random_walks, walk_names, walk_policy,
};

pub use mlg_walker_core::{
    CsrStore, DateAnchor, NegativeTable, NodeIndex, Similarity, TemporalRule, WalkBatch,
    WalkBias, WalkError, WalkPolicy, NEGATIVE, POSITIVE,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
