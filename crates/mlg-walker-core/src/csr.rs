//! Compressed Sparse Row transition store
//!
//! An immutable, integer-indexed view of each node's outgoing edge
//! distribution. Built once per walk batch and shared read-only by every
//! sampling worker.

use crate::error::{WalkError, WalkResult};
use std::sync::OnceLock;

/// Dense node index (0..N)
pub type NodeIndex = u32;

/// Read-only CSR view of a weighted graph.
///
/// Rows do not have to be normalized: samplers treat each row's weights as an
/// unnormalized categorical distribution. A node without out-edges (or whose
/// weights are all zero) is a terminal state, not an error.
#[derive(Debug)]
pub struct CsrStore {
    node_count: usize,
    /// Offsets into `col_idx`. Size = node_count + 1
    row_ptr: Vec<u32>,
    /// Contiguous array of target node indices
    col_idx: Vec<NodeIndex>,
    /// Edge weights, aligned with `col_idx`
    weights: Vec<f32>,
    /// Optional per-node ordering scalar used by temporal walks
    dates: Option<Vec<f32>>,
    /// True when every row of `col_idx` is already ascending
    rows_sorted: bool,
    /// Row-sorted copy of `col_idx` for membership queries, built on first use
    sorted_cols: OnceLock<Vec<NodeIndex>>,
}

impl CsrStore {
    /// Build a store from caller-supplied CSR arrays, validating structure.
    pub fn new(
        node_count: usize,
        row_ptr: Vec<u32>,
        col_idx: Vec<NodeIndex>,
        weights: Vec<f32>,
    ) -> WalkResult<Self> {
        if node_count > NodeIndex::MAX as usize {
            return Err(WalkError::InvalidGraphStructure(format!(
                "node count {} does not fit a u32 node index",
                node_count
            )));
        }
        if row_ptr.len() != node_count + 1 {
            return Err(WalkError::InvalidGraphStructure(format!(
                "row_ptr has length {}, expected {}",
                row_ptr.len(),
                node_count + 1
            )));
        }
        if weights.len() != col_idx.len() {
            return Err(WalkError::InvalidGraphStructure(format!(
                "weight has length {} but col_idx has length {}",
                weights.len(),
                col_idx.len()
            )));
        }
        if row_ptr[0] != 0 {
            return Err(WalkError::InvalidGraphStructure(format!(
                "row_ptr must start at 0, found {}",
                row_ptr[0]
            )));
        }
        if let Some(i) = row_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(WalkError::InvalidGraphStructure(format!(
                "row_ptr decreases between rows {} and {}",
                i,
                i + 1
            )));
        }
        let last = row_ptr[node_count] as usize;
        if last != col_idx.len() {
            return Err(WalkError::InvalidGraphStructure(format!(
                "row_ptr ends at {} but there are {} edges",
                last,
                col_idx.len()
            )));
        }
        if let Some(&bad) = col_idx.iter().find(|&&c| c as usize >= node_count) {
            return Err(WalkError::InvalidGraphStructure(format!(
                "col_idx entry {} is out of range for {} nodes",
                bad, node_count
            )));
        }
        if let Some(&bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(WalkError::InvalidGraphStructure(format!(
                "edge weight {} is negative or not finite",
                bad
            )));
        }

        let rows_sorted = (0..node_count).all(|i| {
            let row = &col_idx[row_ptr[i] as usize..row_ptr[i + 1] as usize];
            row.windows(2).all(|w| w[0] <= w[1])
        });

        Ok(CsrStore {
            node_count,
            row_ptr,
            col_idx,
            weights,
            dates: None,
            rows_sorted,
            sorted_cols: OnceLock::new(),
        })
    }

    /// Build a store from per-node `(target, weight)` lists (test/helper support)
    pub fn from_adjacency_list(adjacency: Vec<Vec<(NodeIndex, f32)>>) -> WalkResult<Self> {
        let node_count = adjacency.len();
        let mut row_ptr = Vec::with_capacity(node_count + 1);
        let mut col_idx = Vec::new();
        let mut weights = Vec::new();

        row_ptr.push(0);
        for row in adjacency {
            for (target, weight) in row {
                col_idx.push(target);
                weights.push(weight);
            }
            let end = u32::try_from(col_idx.len()).map_err(|_| {
                WalkError::InvalidGraphStructure("edge count does not fit a u32 offset".to_string())
            })?;
            row_ptr.push(end);
        }

        Self::new(node_count, row_ptr, col_idx, weights)
    }

    /// Attach per-node dates (required by temporal walk policies).
    ///
    /// Completeness is checked when a temporal policy is sampled, so a store
    /// can carry partial dates for non-temporal use.
    pub fn with_dates(mut self, dates: Vec<f32>) -> Self {
        self.dates = Some(dates);
        self
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.col_idx.len()
    }

    pub fn dates(&self) -> Option<&[f32]> {
        self.dates.as_deref()
    }

    fn row_range(&self, idx: NodeIndex) -> std::ops::Range<usize> {
        let i = idx as usize;
        self.row_ptr[i] as usize..self.row_ptr[i + 1] as usize
    }

    /// Get the out-degree (row length) of a node
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.row_range(idx).len()
    }

    /// Get outgoing neighbors of a node, in stored order
    pub fn successors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.col_idx[self.row_range(idx)]
    }

    /// Get weights for outgoing edges of a node, aligned with [`Self::successors`]
    pub fn weights(&self, idx: NodeIndex) -> &[f32] {
        &self.weights[self.row_range(idx)]
    }

    /// Iterate `(neighbor, weight)` pairs of a node
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, f32)> + '_ {
        self.successors(idx)
            .iter()
            .copied()
            .zip(self.weights(idx).iter().copied())
    }

    /// Sum of a node's outgoing weights
    pub fn weight_sum(&self, idx: NodeIndex) -> f64 {
        self.weights(idx).iter().map(|&w| w as f64).sum()
    }

    /// True when `u -> v` is an edge of the store.
    ///
    /// Binary search over the row; rows that were not stored sorted are
    /// sorted once into a shared side table on the first query.
    pub fn has_edge(&self, u: NodeIndex, v: NodeIndex) -> bool {
        let range = self.row_range(u);
        let row = if self.rows_sorted {
            &self.col_idx[range]
        } else {
            &self.sorted_cols.get_or_init(|| self.build_sorted_cols())[range]
        };
        row.binary_search(&v).is_ok()
    }

    fn build_sorted_cols(&self) -> Vec<NodeIndex> {
        let mut sorted = self.col_idx.clone();
        for i in 0..self.node_count {
            let start = self.row_ptr[i] as usize;
            let end = self.row_ptr[i + 1] as usize;
            sorted[start..end].sort_unstable();
        }
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> CsrStore {
        // 0 -> {1, 2}, 1 -> {2, 0}, 2 -> {}
        CsrStore::new(3, vec![0, 2, 4, 4], vec![1, 2, 2, 0], vec![0.5, 0.5, 1.0, 3.0]).unwrap()
    }

    #[test]
    fn test_row_accessors() {
        let store = triangle();
        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 4);
        assert_eq!(store.successors(1), &[2, 0]);
        assert_eq!(store.weights(1), &[1.0, 3.0]);
        assert_eq!(store.out_degree(2), 0);
        assert_eq!(store.weight_sum(1), 4.0);
        assert_eq!(store.neighbors(0).collect::<Vec<_>>(), vec![(1, 0.5), (2, 0.5)]);
    }

    #[test]
    fn test_has_edge_unsorted_rows() {
        let store = triangle();
        assert!(!store.rows_sorted);
        assert!(store.has_edge(1, 0));
        assert!(store.has_edge(1, 2));
        assert!(!store.has_edge(2, 0));
        assert!(!store.has_edge(0, 0));
    }

    #[test]
    fn test_rejects_non_monotonic_row_ptr() {
        let err = CsrStore::new(2, vec![0, 2, 1], vec![1, 0], vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, WalkError::InvalidGraphStructure(_)));
    }

    #[test]
    fn test_rejects_out_of_range_column() {
        let err = CsrStore::new(2, vec![0, 1, 1], vec![5], vec![1.0]).unwrap_err();
        assert!(matches!(err, WalkError::InvalidGraphStructure(_)));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let err = CsrStore::new(2, vec![0, 1, 2], vec![1, 0], vec![1.0]).unwrap_err();
        assert!(matches!(err, WalkError::InvalidGraphStructure(_)));

        let err = CsrStore::new(3, vec![0, 1, 2], vec![1, 0], vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, WalkError::InvalidGraphStructure(_)));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = CsrStore::new(2, vec![0, 1, 1], vec![1], vec![-0.5]).unwrap_err();
        assert!(matches!(err, WalkError::InvalidGraphStructure(_)));
    }

    #[test]
    fn test_from_adjacency_list() {
        let store = CsrStore::from_adjacency_list(vec![
            vec![(1, 1.0)],
            vec![],
            vec![(0, 2.0), (1, 1.0)],
        ])
        .unwrap();
        assert_eq!(store.edge_count(), 3);
        assert_eq!(store.successors(0), &[1]);
        assert!(store.successors(1).is_empty());
        assert_eq!(store.successors(2), &[0, 1]);
        assert_eq!(store.weights(2), &[2.0, 1.0]);
        assert!(store.has_edge(2, 1));
    }
}
