//! Attributed graph consumed by the walk orchestration layer
//!
//! Nodes are named and carry attributes (e.g. `date`); edges carry
//! attributes (e.g. `weight`). Dense node ids follow insertion order.

pub mod property;
pub mod store;
pub mod types;

pub use property::{PropertyMap, PropertyValue};
pub use store::{Graph, GraphError, GraphResult, Node};
pub use types::{Direction, NodeId};
