//! Negative sampling table
//!
//! A flat pool of node indices drawn i.i.d. from `weight[i]^ns_exponent`
//! (normalized). Drawing uniformly from the pool reproduces the power-law
//! distribution without re-sampling the categorical each time.

use crate::csr::{CsrStore, NodeIndex};
use crate::error::{WalkError, WalkResult};
use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Immutable pool of negative samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeTable {
    entries: Vec<NodeIndex>,
}

impl NegativeTable {
    /// Draw `size` node indices with probability proportional to `weight^ns_exponent`.
    pub fn build(weights: &[f32], ns_exponent: f32, size: usize, seed: u64) -> WalkResult<Self> {
        if size == 0 {
            return Err(WalkError::InvalidParameter(
                "negative table size must be positive".to_string(),
            ));
        }
        if !ns_exponent.is_finite() {
            return Err(WalkError::InvalidParameter(format!(
                "ns_exponent must be finite, got {}",
                ns_exponent
            )));
        }
        if weights.len() > NodeIndex::MAX as usize {
            return Err(WalkError::InvalidParameter(format!(
                "{} node weights do not fit u32 node indices",
                weights.len()
            )));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(WalkError::InvalidParameter(format!(
                "node weight {} is negative or not finite",
                bad
            )));
        }

        // 0^x is 1 for x == 0 and inf for x < 0; zero-weight nodes never enter the table
        let powered: Vec<f64> = weights
            .iter()
            .map(|&w| if w > 0.0 { (w as f64).powf(ns_exponent as f64) } else { 0.0 })
            .collect();

        let dist = WeightedIndex::new(&powered).map_err(|e| {
            WalkError::InvalidParameter(format!("cannot build negative distribution: {}", e))
        })?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let entries: Vec<NodeIndex> = (0..size)
            .map(|_| dist.sample(&mut rng) as NodeIndex)
            .collect();

        debug!(
            "Built negative table of {} entries over {} nodes (ns_exponent={})",
            size,
            weights.len(),
            ns_exponent
        );

        Ok(NegativeTable { entries })
    }

    /// Use each node's outgoing weight sum as its sampling weight.
    pub fn from_store(
        store: &CsrStore,
        ns_exponent: f32,
        size: usize,
        seed: u64,
    ) -> WalkResult<Self> {
        let weights: Vec<f32> = (0..store.node_count() as NodeIndex)
            .map(|i| store.weight_sum(i) as f32)
            .collect();
        Self::build(&weights, ns_exponent, size, seed)
    }

    /// Wrap a table produced elsewhere.
    pub fn from_vec(entries: Vec<NodeIndex>) -> WalkResult<Self> {
        if entries.is_empty() {
            return Err(WalkError::InvalidParameter(
                "negative table must not be empty".to_string(),
            ));
        }
        Ok(NegativeTable { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[NodeIndex] {
        &self.entries
    }
}

impl AsRef<[NodeIndex]> for NegativeTable {
    fn as_ref(&self) -> &[NodeIndex] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_weight_nodes_never_drawn() {
        let table = NegativeTable::build(&[0.0, 3.0, 0.0, 1.0], 0.75, 5000, 7).unwrap();
        assert_eq!(table.len(), 5000);
        assert!(table.as_slice().iter().all(|&n| n == 1 || n == 3));
    }

    #[test]
    fn test_power_law_frequencies() {
        // 16^0.5 : 1^0.5 = 4 : 1
        let table = NegativeTable::build(&[16.0, 1.0], 0.5, 50_000, 3).unwrap();
        let zeros = table.as_slice().iter().filter(|&&n| n == 0).count() as f64;
        let share = zeros / table.len() as f64;
        assert!((share - 0.8).abs() < 0.01, "share of node 0 was {}", share);
    }

    #[test]
    fn test_zero_exponent_is_uniform_over_positive_weights() {
        let table = NegativeTable::build(&[100.0, 1.0], 0.0, 40_000, 1).unwrap();
        let zeros = table.as_slice().iter().filter(|&&n| n == 0).count() as f64;
        assert!((zeros / 40_000.0 - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = NegativeTable::build(&[1.0, 2.0, 3.0], 0.75, 100, 42).unwrap();
        let b = NegativeTable::build(&[1.0, 2.0, 3.0], 0.75, 100, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(NegativeTable::build(&[1.0], 0.75, 0, 0).is_err());
        assert!(NegativeTable::build(&[1.0], f32::NAN, 10, 0).is_err());
        assert!(NegativeTable::build(&[0.0, 0.0], 0.75, 10, 0).is_err());
        assert!(NegativeTable::build(&[-1.0, 2.0], 0.75, 10, 0).is_err());
        assert!(NegativeTable::from_vec(vec![]).is_err());
    }
}
