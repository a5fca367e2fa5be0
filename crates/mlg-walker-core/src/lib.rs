//! Random walk sampling core
//!
//! Generates fixed-length random walks over an immutable CSR transition
//! store (uniform, time-constrained, node2vec and restart policies) and
//! corrupts them with negative samples for contrastive training.
//!
//! ```
//! use mlg_walker_core::{sample, CsrStore, WalkPolicy};
//!
//! // 0 <-> 1 <-> 2
//! let store = CsrStore::from_adjacency_list(vec![
//!     vec![(1, 1.0)],
//!     vec![(0, 0.5), (2, 0.5)],
//!     vec![(1, 1.0)],
//! ])
//! .unwrap();
//!
//! let walks = sample(&store, &[0, 2], 5, 8, &WalkPolicy::node2vec(0.5, 2.0), 42).unwrap();
//! assert_eq!(walks.shape(), &[2, 5, 8]);
//! ```

pub mod corruption;
pub mod csr;
pub mod error;
pub mod negative;
pub mod policy;
pub mod sampler;

pub use corruption::{corrupt, Similarity, NEGATIVE, POSITIVE};
pub use csr::{CsrStore, NodeIndex};
pub use error::{WalkError, WalkResult};
pub use negative::NegativeTable;
pub use policy::{DateAnchor, TemporalRule, WalkBias, WalkPolicy};
pub use sampler::{sample, WalkBatch};
