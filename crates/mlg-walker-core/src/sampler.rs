//! Random walk sampler
//!
//! Generates `n_walks` fixed-length walks per start node under a
//! [`WalkPolicy`]. Every walk owns a ChaCha stream derived from the caller's
//! seed and its position in the batch, so the output is bit-identical for a
//! given seed regardless of how rayon schedules the work.

use crate::csr::{CsrStore, NodeIndex};
use crate::error::{WalkError, WalkResult};
use crate::policy::{DateAnchor, WalkBias, WalkPolicy};
use ndarray::Array3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

/// Walks laid out as `n_start_nodes x n_walks x walk_len`
pub type WalkBatch = Array3<NodeIndex>;

/// Sample random walks.
///
/// Each walk has exactly `walk_len` entries including the start node. A walk
/// that reaches a node without an eligible transition repeats that node for
/// its remaining positions (self-loop padding).
pub fn sample(
    store: &CsrStore,
    start_nodes: &[NodeIndex],
    n_walks: usize,
    walk_len: usize,
    policy: &WalkPolicy,
    seed: u64,
) -> WalkResult<WalkBatch> {
    validate_request(store, start_nodes, n_walks, walk_len)?;
    policy.validate(store)?;

    debug!(
        "Sampling {} walks of length {} from {} start nodes ({:?})",
        n_walks,
        walk_len,
        start_nodes.len(),
        policy
    );

    let walker = Walker {
        store,
        policy,
        dates: store.dates(),
    };

    let mut cells = vec![0 as NodeIndex; start_nodes.len() * n_walks * walk_len];
    cells
        .par_chunks_mut(walk_len)
        .enumerate()
        .for_each_init(Vec::new, |buf, (walk_idx, out)| {
            let start = start_nodes[walk_idx / n_walks];
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(walk_idx as u64);
            walker.walk(start, out, buf, &mut rng);
        });

    Ok(Array3::from_shape_vec(
        (start_nodes.len(), n_walks, walk_len),
        cells,
    )?)
}

fn validate_request(
    store: &CsrStore,
    start_nodes: &[NodeIndex],
    n_walks: usize,
    walk_len: usize,
) -> WalkResult<()> {
    if start_nodes.is_empty() {
        return Err(WalkError::InvalidParameter(
            "start_nodes must not be empty".to_string(),
        ));
    }
    if n_walks == 0 {
        return Err(WalkError::InvalidParameter(
            "n_walks must be positive".to_string(),
        ));
    }
    if walk_len == 0 {
        return Err(WalkError::InvalidParameter(
            "walk_len must be positive".to_string(),
        ));
    }
    if let Some(&bad) = start_nodes
        .iter()
        .find(|&&s| s as usize >= store.node_count())
    {
        return Err(WalkError::InvalidParameter(format!(
            "start node {} is out of range for {} nodes",
            bad,
            store.node_count()
        )));
    }
    start_nodes
        .len()
        .checked_mul(n_walks)
        .and_then(|n| n.checked_mul(walk_len))
        .ok_or_else(|| WalkError::InvalidParameter("walk batch is too large".to_string()))?;
    Ok(())
}

/// Read-only walk state shared by all workers
struct Walker<'a> {
    store: &'a CsrStore,
    policy: &'a WalkPolicy,
    dates: Option<&'a [f32]>,
}

impl Walker<'_> {
    fn walk<R: Rng>(
        &self,
        start: NodeIndex,
        out: &mut [NodeIndex],
        buf: &mut Vec<f64>,
        rng: &mut R,
    ) {
        out[0] = start;
        let mut prev: Option<NodeIndex> = None;
        let mut curr = start;

        for pos in 1..out.len() {
            let next = match self.policy.bias {
                WalkBias::Restart { alpha }
                    if rng.gen::<f64>() < alpha as f64 && self.admits(start, start, curr) =>
                {
                    Some(start)
                }
                _ => self.step(start, prev, curr, buf, rng),
            };

            match next {
                Some(node) => {
                    out[pos] = node;
                    prev = Some(curr);
                    curr = node;
                }
                None => {
                    out[pos..].fill(curr);
                    break;
                }
            }
        }
    }

    /// Whether the temporal rule (if any) lets the walk move to `candidate`.
    ///
    /// Restarts go through the same gate as regular steps; a rejected restart
    /// falls back to a regular step.
    fn admits(&self, candidate: NodeIndex, start: NodeIndex, curr: NodeIndex) -> bool {
        match (self.policy.temporal, self.dates) {
            (Some(rule), Some(dates)) => {
                let anchor = match rule.anchor {
                    DateAnchor::Start => dates[start as usize],
                    DateAnchor::Current => dates[curr as usize],
                };
                rule.admits(dates[candidate as usize], anchor)
            }
            _ => true,
        }
    }

    /// Draw the successor of `curr`, or `None` at a dead end.
    fn step<R: Rng>(
        &self,
        start: NodeIndex,
        prev: Option<NodeIndex>,
        curr: NodeIndex,
        buf: &mut Vec<f64>,
        rng: &mut R,
    ) -> Option<NodeIndex> {
        let nbrs = self.store.successors(curr);
        if nbrs.is_empty() {
            return None;
        }
        let wts = self.store.weights(curr);

        buf.clear();
        buf.extend(nbrs.iter().zip(wts).map(|(&x, &w)| {
            if !self.admits(x, start, curr) {
                return 0.0;
            }
            let w = w as f64;
            match (self.policy.bias, prev) {
                (WalkBias::Node2Vec { p, q }, Some(t)) => {
                    if x == t {
                        w / p as f64
                    } else if self.store.has_edge(t, x) {
                        w
                    } else {
                        w / q as f64
                    }
                }
                _ => w,
            }
        }));

        draw(rng, nbrs, buf)
    }
}

/// Draw from `candidates` proportionally to `weights` (not necessarily normalized).
///
/// Returns `None` when no candidate has positive weight.
fn draw<R: Rng>(rng: &mut R, candidates: &[NodeIndex], weights: &[f64]) -> Option<NodeIndex> {
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return None;
    }

    let target = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    let mut last = None;
    for (&node, &w) in candidates.iter().zip(weights) {
        if w <= 0.0 {
            continue;
        }
        acc += w;
        last = Some(node);
        if target < acc {
            return last;
        }
    }
    // Rounding can leave `target` just above the final prefix sum
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> CsrStore {
        // 0 - 1 - 2, 3 isolated
        CsrStore::from_adjacency_list(vec![
            vec![(1, 1.0)],
            vec![(0, 1.0), (2, 1.0)],
            vec![(1, 1.0)],
            vec![],
        ])
        .unwrap()
    }

    #[test]
    fn test_batch_shape() {
        let store = path();
        let walks = sample(&store, &[0, 1, 1], 4, 7, &WalkPolicy::uniform(), 1).unwrap();
        assert_eq!(walks.shape(), &[3, 4, 7]);
        for s in 0..3 {
            for w in 0..4 {
                assert_eq!(walks[[s, w, 0]], [0, 1, 1][s]);
            }
        }
    }

    #[test]
    fn test_isolated_node_is_padded() {
        let store = path();
        let walks = sample(&store, &[3], 2, 5, &WalkPolicy::uniform(), 9).unwrap();
        assert!(walks.iter().all(|&n| n == 3));
    }

    #[test]
    fn test_zero_weight_row_is_dead_end() {
        let store = CsrStore::from_adjacency_list(vec![vec![(1, 1.0)], vec![(0, 0.0)]]).unwrap();
        let walks = sample(&store, &[0], 1, 4, &WalkPolicy::uniform(), 0).unwrap();
        assert_eq!(walks.iter().copied().collect::<Vec<_>>(), vec![0, 1, 1, 1]);
    }

    #[test]
    fn test_single_step_walks_are_start_nodes() {
        let store = path();
        let walks = sample(&store, &[2, 0], 3, 1, &WalkPolicy::node2vec(0.5, 4.0), 3).unwrap();
        assert_eq!(walks.shape(), &[2, 3, 1]);
        assert!(walks.slice(ndarray::s![0, .., ..]).iter().all(|&n| n == 2));
    }

    #[test]
    fn test_invalid_requests() {
        let store = path();
        let policy = WalkPolicy::uniform();
        let invalid = |starts: &[NodeIndex], n_walks, walk_len| {
            matches!(
                sample(&store, starts, n_walks, walk_len, &policy, 0),
                Err(WalkError::InvalidParameter(_))
            )
        };
        assert!(invalid(&[], 1, 1));
        assert!(invalid(&[0], 0, 1));
        assert!(invalid(&[0], 1, 0));
        assert!(invalid(&[4], 1, 1));
    }

    #[test]
    fn test_draw_skips_zero_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(draw(&mut rng, &[7, 8, 9], &[0.0, 2.0, 0.0]), Some(8));
        }
        assert_eq!(draw(&mut rng, &[7, 8], &[0.0, 0.0]), None);
    }

    #[test]
    fn test_node2vec_low_p_prefers_return() {
        // 0 - 1 - 2: from 1 having arrived from 0, p small makes returning to 0 dominant
        let store = path();
        let walks = sample(&store, &[0], 2000, 3, &WalkPolicy::node2vec(0.01, 1.0), 11).unwrap();
        let returns = walks
            .slice(ndarray::s![.., .., 2])
            .iter()
            .filter(|&&n| n == 0)
            .count();
        assert!(returns > 1900, "expected mostly returns, got {}", returns);
    }
}
