//! Walk corruption for contrastive training
//!
//! Every walk position is independently replaced, with probability `r`, by a
//! node drawn uniformly from a negative table. The returned similarity array
//! marks untouched positions with [`POSITIVE`] and replaced ones with
//! [`NEGATIVE`].

use crate::csr::NodeIndex;
use crate::error::{WalkError, WalkResult};
use crate::sampler::WalkBatch;
use ndarray::Array3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

/// Per-position labels, same shape as the walk batch
pub type Similarity = Array3<f32>;

/// Label of a position that still holds the sampled walk node
pub const POSITIVE: f32 = 1.0;
/// Label of a position replaced by a negative sample
pub const NEGATIVE: f32 = 0.0;

/// Corrupt `walks` in place and return the per-position similarity labels.
///
/// Each walk row owns a ChaCha stream keyed by `seed` and its row index, so
/// the result does not depend on the number of worker threads.
pub fn corrupt(
    walks: &mut WalkBatch,
    negative_table: &[NodeIndex],
    n_nodes: usize,
    r: f32,
    seed: u64,
) -> WalkResult<Similarity> {
    if !(0.0..=1.0).contains(&r) {
        return Err(WalkError::InvalidParameter(format!(
            "corruption probability r must be in [0, 1], got {}",
            r
        )));
    }
    if negative_table.is_empty() {
        return Err(WalkError::InvalidParameter(
            "negative table must not be empty".to_string(),
        ));
    }
    if let Some(&bad) = negative_table.iter().find(|&&n| n as usize >= n_nodes) {
        return Err(WalkError::InvalidParameter(format!(
            "negative table entry {} is out of range for {} nodes",
            bad, n_nodes
        )));
    }
    if let Some(&bad) = walks.iter().find(|&&n| n as usize >= n_nodes) {
        return Err(WalkError::InvalidParameter(format!(
            "walk entry {} is out of range for {} nodes",
            bad, n_nodes
        )));
    }

    let mut similarity = Array3::from_elem(walks.raw_dim(), POSITIVE);
    let walk_len = walks.shape()[2];
    if walks.is_empty() {
        return Ok(similarity);
    }

    debug!(
        "Corrupting {} walk positions with r={} from a table of {}",
        walks.len(),
        r,
        negative_table.len()
    );

    let labels = similarity
        .as_slice_mut()
        .ok_or_else(|| {
            WalkError::InvalidParameter("similarity buffer is not contiguous".to_string())
        })?;
    let cells = walks.as_slice_mut().ok_or_else(|| {
        WalkError::InvalidParameter("walk batch must be in standard row-major layout".to_string())
    })?;

    let r = r as f64;
    cells
        .par_chunks_mut(walk_len)
        .zip(labels.par_chunks_mut(walk_len))
        .enumerate()
        .for_each(|(row, (walk, row_labels))| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(row as u64);
            for (node, label) in walk.iter_mut().zip(row_labels.iter_mut()) {
                if rng.gen::<f64>() < r {
                    *node = negative_table[rng.gen_range(0..negative_table.len())];
                    *label = NEGATIVE;
                }
            }
        });

    Ok(similarity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> WalkBatch {
        Array3::from_shape_fn((3, 2, 5), |(s, w, i)| ((s + w + i) % 4) as NodeIndex)
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let mut walks = batch();
        let original = walks.clone();
        let sim = corrupt(&mut walks, &[0, 1, 2, 3], 4, 0.0, 1).unwrap();
        assert_eq!(walks, original);
        assert!(sim.iter().all(|&s| s == POSITIVE));
        assert_eq!(sim.shape(), walks.shape());
    }

    #[test]
    fn test_full_rate_replaces_everything() {
        let mut walks = batch();
        let sim = corrupt(&mut walks, &[3], 4, 1.0, 1).unwrap();
        assert!(walks.iter().all(|&n| n == 3));
        assert!(sim.iter().all(|&s| s == NEGATIVE));
    }

    #[test]
    fn test_labels_match_replacements() {
        // Table only holds node 9, which never occurs in the input walks
        let mut walks = batch();
        let sim = corrupt(&mut walks, &[9], 10, 0.3, 5).unwrap();
        for (node, label) in walks.iter().zip(sim.iter()) {
            assert_eq!(*node == 9, *label == NEGATIVE);
        }
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut walks = batch();
        let mut invalid = |table: &[NodeIndex], n_nodes, r| {
            matches!(
                corrupt(&mut walks, table, n_nodes, r, 0),
                Err(WalkError::InvalidParameter(_))
            )
        };
        assert!(invalid(&[0], 4, 1.5));
        assert!(invalid(&[], 4, 0.5));
        assert!(invalid(&[7], 4, 0.5));
        assert!(invalid(&[0], 3, 0.5));
    }
}
