//! In-memory attributed graph
//!
//! Nodes are addressed by name and keep their insertion order, which fixes
//! their dense index in every extracted adjacency and walk batch. Adjacency
//! is stored per node in insertion-ordered maps so re-adding an edge updates
//! its attributes in place.

use super::property::{PropertyMap, PropertyValue};
use super::types::{Direction, NodeId};
use indexmap::IndexMap;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during graph construction and attribute lookup
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Node {0} not found")]
    NodeIndexOutOfRange(NodeId),

    #[error("Graph is full: at most {0} nodes are supported")]
    TooManyNodes(usize),

    #[error("Invalid weight on edge {from} -> {to}: {reason}")]
    InvalidWeight {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Invalid attribute '{key}' on node '{node}': {reason}")]
    InvalidAttribute {
        node: String,
        key: String,
        reason: String,
    },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// A named node and its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub properties: PropertyMap,
}

impl Node {
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

/// Weighted, attributed graph (the orchestration layer's input)
#[derive(Debug, Clone, Default)]
pub struct Graph {
    direction: Direction,
    nodes: Vec<Node>,
    name_index: HashMap<String, NodeId>,
    /// Outgoing adjacency per node: target -> edge attributes
    adjacency: Vec<IndexMap<NodeId, PropertyMap>>,
    edge_count: usize,
}

impl Graph {
    pub fn new(direction: Direction) -> Self {
        Graph {
            direction,
            ..Default::default()
        }
    }

    pub fn undirected() -> Self {
        Self::new(Direction::Undirected)
    }

    pub fn directed() -> Self {
        Self::new(Direction::Directed)
    }

    pub fn is_directed(&self) -> bool {
        self.direction == Direction::Directed
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges (an undirected edge counts once)
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Add a node, or return the existing id when the name is already present
    pub fn add_node(&mut self, name: impl Into<String>) -> GraphResult<NodeId> {
        let name = name.into();
        if let Some(&id) = self.name_index.get(&name) {
            return Ok(id);
        }
        if self.nodes.len() >= u32::MAX as usize {
            return Err(GraphError::TooManyNodes(u32::MAX as usize));
        }

        let id = NodeId::new(self.nodes.len() as u32);
        self.name_index.insert(name.clone(), id);
        self.nodes.push(Node {
            id,
            name,
            properties: PropertyMap::new(),
        });
        self.adjacency.push(IndexMap::new());
        Ok(id)
    }

    pub fn set_node_property(
        &mut self,
        name: &str,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> GraphResult<()> {
        let id = self.node_id(name)?;
        self.nodes[id.index()]
            .properties
            .insert(key.into(), value.into());
        Ok(())
    }

    /// Look up a node's dense id by name
    pub fn node_id(&self, name: &str) -> GraphResult<NodeId> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Name of the node at a dense index (e.g. a walk batch entry)
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Add an edge without attributes, creating missing endpoints
    pub fn add_edge(&mut self, source: &str, target: &str) -> GraphResult<(NodeId, NodeId)> {
        self.add_edge_with_properties(source, target, PropertyMap::new())
    }

    /// Add an edge carrying a `weight` attribute
    pub fn add_weighted_edge(
        &mut self,
        source: &str,
        target: &str,
        weight: f64,
    ) -> GraphResult<(NodeId, NodeId)> {
        let mut props = PropertyMap::new();
        props.insert("weight".to_string(), PropertyValue::Float(weight));
        self.add_edge_with_properties(source, target, props)
    }

    /// Add an edge, creating missing endpoints. Re-adding an existing edge
    /// merges the new attributes into the old ones.
    pub fn add_edge_with_properties(
        &mut self,
        source: &str,
        target: &str,
        properties: PropertyMap,
    ) -> GraphResult<(NodeId, NodeId)> {
        let u = self.add_node(source)?;
        let v = self.add_node(target)?;

        let is_new = !self.adjacency[u.index()].contains_key(&v);
        self.adjacency[u.index()]
            .entry(v)
            .or_default()
            .extend(properties.clone());
        if !self.is_directed() && u != v {
            self.adjacency[v.index()]
                .entry(u)
                .or_default()
                .extend(properties);
        }
        if is_new {
            self.edge_count += 1;
        }
        Ok((u, v))
    }

    /// Outgoing neighbors with edge attributes, in insertion order
    pub fn neighbors(
        &self,
        id: NodeId,
    ) -> GraphResult<impl Iterator<Item = (NodeId, &PropertyMap)> + '_> {
        let row = self
            .adjacency
            .get(id.index())
            .ok_or(GraphError::NodeIndexOutOfRange(id))?;
        Ok(row.iter().map(|(&v, props)| (v, props)))
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.adjacency.get(id.index()).map_or(0, IndexMap::len)
    }

    /// Weight of an edge under `weight_attr`.
    ///
    /// `None` means unweighted (every edge weighs 1.0); an edge that lacks
    /// the attribute also weighs 1.0.
    pub fn edge_weight(
        &self,
        source: NodeId,
        target: NodeId,
        props: &PropertyMap,
        weight_attr: Option<&str>,
    ) -> GraphResult<f64> {
        let Some(attr) = weight_attr else {
            return Ok(1.0);
        };
        let value = match props.get(attr) {
            None | Some(PropertyValue::Null) => return Ok(1.0),
            Some(value) => value,
        };
        let invalid = |reason: String| GraphError::InvalidWeight {
            from: self.node_name(source).unwrap_or_default().to_string(),
            to: self.node_name(target).unwrap_or_default().to_string(),
            reason,
        };
        let w = value
            .as_number()
            .ok_or_else(|| invalid(format!("'{}' is a {}", attr, value.type_name())))?;
        if !w.is_finite() || w < 0.0 {
            return Err(invalid(format!("'{}' = {} is negative or not finite", attr, w)));
        }
        Ok(w)
    }

    /// Sum of incident edge weights for every node, in index order.
    ///
    /// An undirected self-loop contributes twice; for directed graphs both
    /// outgoing and incoming edges count. One pass over the edges.
    pub fn weighted_degrees(&self, weight_attr: Option<&str>) -> GraphResult<Vec<f64>> {
        let mut degrees = vec![0.0; self.nodes.len()];
        for (u, row) in self.adjacency.iter().enumerate() {
            let source = NodeId::new(u as u32);
            for (&v, props) in row {
                let w = self.edge_weight(source, v, props, weight_attr)?;
                degrees[u] += w;
                if self.is_directed() || v == source {
                    degrees[v.index()] += w;
                }
            }
        }
        Ok(degrees)
    }

    /// Numeric node attribute, e.g. the `date` used by temporal walks
    pub fn node_number(&self, id: NodeId, key: &str) -> GraphResult<Option<f64>> {
        let node = self.node(id).ok_or(GraphError::NodeIndexOutOfRange(id))?;
        match node.get_property(key) {
            None | Some(PropertyValue::Null) => Ok(None),
            Some(value) => value.as_number().map(Some).ok_or_else(|| GraphError::InvalidAttribute {
                node: node.name.clone(),
                key: key.to_string(),
                reason: format!("expected a number, found {}", value.type_name()),
            }),
        }
    }
}
