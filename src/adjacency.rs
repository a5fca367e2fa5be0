//! Adjacency extraction
//!
//! Projects a [`Graph`] onto the sampling core's [`CsrStore`]: rows follow
//! node insertion order, neighbors within a row are sorted ascending, and
//! weights come from an edge attribute.

use crate::error::{WalkerError, WalkerResult};
use crate::graph::{Graph, NodeId};
use mlg_walker_core::{CsrStore, WalkError};

/// Build the raw weighted adjacency (weights as stored on the edges)
pub fn adjacency(graph: &Graph, weight_attr: Option<&str>) -> WalkerResult<CsrStore> {
    build(graph, weight_attr, false)
}

/// Build the row-stochastic adjacency: each row divided by its weight sum.
///
/// Rows with no edges or an all-zero weight sum are left as they are and
/// act as dead ends for the sampler.
pub fn normalized_adjacency(graph: &Graph, weight_attr: Option<&str>) -> WalkerResult<CsrStore> {
    build(graph, weight_attr, true)
}

fn build(graph: &Graph, weight_attr: Option<&str>, normalize: bool) -> WalkerResult<CsrStore> {
    let node_count = graph.node_count();
    let mut row_ptr = Vec::with_capacity(node_count + 1);
    let mut col_idx = Vec::new();
    let mut weights = Vec::new();
    let mut row: Vec<(u32, f64)> = Vec::new();

    row_ptr.push(0u32);
    for u in 0..node_count as u32 {
        let u = NodeId::new(u);
        row.clear();
        for (v, props) in graph.neighbors(u)? {
            row.push((v.as_u32(), graph.edge_weight(u, v, props, weight_attr)?));
        }
        row.sort_unstable_by_key(|&(v, _)| v);

        let sum: f64 = row.iter().map(|&(_, w)| w).sum();
        let scale = if normalize && sum > 0.0 { 1.0 / sum } else { 1.0 };
        for &(v, w) in &row {
            col_idx.push(v);
            weights.push((w * scale) as f32);
        }

        let end = u32::try_from(col_idx.len()).map_err(|_| {
            WalkError::InvalidGraphStructure(format!(
                "{} edges exceed the u32 offset range",
                col_idx.len()
            ))
        })?;
        row_ptr.push(end);
    }

    Ok(CsrStore::new(node_count, row_ptr, col_idx, weights)?)
}

/// Per-node dates read from a numeric node attribute.
///
/// Every node must carry the attribute.
pub fn node_dates(graph: &Graph, date_attr: &str) -> WalkerResult<Vec<f32>> {
    graph
        .nodes()
        .map(|node| -> WalkerResult<f32> {
            match graph.node_number(node.id, date_attr)? {
                Some(date) => Ok(date as f32),
                None => Err(WalkerError::from(WalkError::MissingAttribute(format!(
                    "node '{}' has no '{}' attribute",
                    node.name, date_attr
                )))),
            }
        })
        .collect()
}

/// Weighted degree of every node, in index order
pub fn weighted_degrees(graph: &Graph, weight_attr: Option<&str>) -> WalkerResult<Vec<f32>> {
    Ok(graph
        .weighted_degrees(weight_attr)?
        .into_iter()
        .map(|d| d as f32)
        .collect())
}
