//! Walk orchestration
//!
//! Glue between the attributed [`Graph`] and the sampling core: extracts the
//! normalized adjacency, resolves start nodes and dates, picks the walk
//! policy from the keyword parameters, and builds the negative table for
//! corruption. Phase timings are logged through `tracing`.

use crate::adjacency::{node_dates, normalized_adjacency, weighted_degrees};
use crate::config::{CorruptOptions, WalkOptions};
use crate::error::WalkerResult;
use crate::graph::Graph;
use mlg_walker_core::{
    sample, NegativeTable, NodeIndex, Similarity, TemporalRule, WalkBatch, WalkPolicy,
};
use std::time::Instant;
use tracing::{debug, info};

/// Generate `n_walks` walks of `walk_len` nodes from each start node.
///
/// Entries of the returned batch are dense node ids; map them back with
/// [`Graph::node_name`].
pub fn random_walks(graph: &Graph, options: &WalkOptions) -> WalkerResult<WalkBatch> {
    let start_time = Instant::now();

    let mut store = normalized_adjacency(graph, options.weight.as_deref())?;
    if options.no_future {
        store = store.with_dates(node_dates(graph, &options.date_attribute)?);
    }

    let start_nodes = resolve_start_nodes(graph, options.start_nodes.as_deref())?;
    let policy = walk_policy(options)?;
    let seed = options.seed.unwrap_or_else(rand::random);
    debug!("Walk policy {:?}, seed {}", policy, seed);

    let walks = sample(
        &store,
        &start_nodes,
        options.n_walks,
        options.walk_len,
        &policy,
        seed,
    )?;

    if options.verbose {
        info!("Random walks - T={:.2}s", start_time.elapsed().as_secs_f64());
    }
    Ok(walks)
}

/// Corrupt `walks` in place with negative samples drawn by weighted degree.
///
/// Returns the per-position similarity labels (1.0 = kept, 0.0 = replaced).
pub fn corrupt(
    graph: &Graph,
    walks: &mut WalkBatch,
    options: &CorruptOptions,
) -> WalkerResult<Similarity> {
    let start_time = Instant::now();

    let seed = options.seed.unwrap_or_else(rand::random);
    let table = negative_table(graph, options, seed)?;
    // Separate stream family from the table draw
    let similarity = mlg_walker_core::corrupt(
        walks,
        table.as_slice(),
        graph.node_count(),
        options.r,
        seed.wrapping_add(1),
    )?;

    if options.verbose {
        info!(
            "Corrupt random walks - T={:.2}s",
            start_time.elapsed().as_secs_f64()
        );
    }
    Ok(similarity)
}

/// Sample walks and corrupt them; returns the corrupted walks and their labels
pub fn corrupted_random_walks(
    graph: &Graph,
    walk_options: &WalkOptions,
    corrupt_options: &CorruptOptions,
) -> WalkerResult<(WalkBatch, Similarity)> {
    let mut walks = random_walks(graph, walk_options)?;
    let similarity = corrupt(graph, &mut walks, corrupt_options)?;
    Ok((walks, similarity))
}

/// Negative table over weighted degrees raised to `ns_exponent`
pub fn negative_table(
    graph: &Graph,
    options: &CorruptOptions,
    seed: u64,
) -> WalkerResult<NegativeTable> {
    let degrees = weighted_degrees(graph, options.weight.as_deref())?;
    Ok(NegativeTable::build(
        &degrees,
        options.ns_exponent,
        options.negative_size,
        seed,
    )?)
}

/// Translate the keyword parameters into a [`WalkPolicy`]
pub fn walk_policy(options: &WalkOptions) -> WalkerResult<WalkPolicy> {
    let policy = WalkPolicy::from_params(options.p, options.q, options.alpha, false)?;
    Ok(if options.no_future {
        policy.with_temporal(TemporalRule {
            anchor: options.date_anchor,
            inclusive: options.inclusive_dates,
        })
    } else {
        policy
    })
}

fn resolve_start_nodes(graph: &Graph, names: Option<&[String]>) -> WalkerResult<Vec<NodeIndex>> {
    match names {
        None => Ok((0..graph.node_count() as NodeIndex).collect()),
        Some(names) => names
            .iter()
            .map(|name| -> WalkerResult<NodeIndex> { Ok(graph.node_id(name)?.as_u32()) })
            .collect(),
    }
}

/// Map a walk batch back to node names, `[start][walk][step]`
pub fn walk_names(graph: &Graph, walks: &WalkBatch) -> Vec<Vec<Vec<String>>> {
    walks
        .outer_iter()
        .map(|per_start| {
            per_start
                .outer_iter()
                .map(|walk| {
                    walk.iter()
                        .map(|&n| {
                            graph
                                .node_name(n.into())
                                .unwrap_or_default()
                                .to_string()
                        })
                        .collect()
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlg_walker_core::{DateAnchor, WalkBias};

    #[test]
    fn test_policy_from_options() {
        let mut options = WalkOptions::default();
        assert_eq!(walk_policy(&options).unwrap(), WalkPolicy::uniform());

        options.alpha = 0.2;
        assert_eq!(walk_policy(&options).unwrap().bias, WalkBias::Restart { alpha: 0.2 });

        options.alpha = 0.0;
        options.p = 0.5;
        options.no_future = true;
        options.date_anchor = DateAnchor::Current;
        let policy = walk_policy(&options).unwrap();
        assert_eq!(policy.bias, WalkBias::Node2Vec { p: 0.5, q: 1.0 });
        assert_eq!(policy.temporal.unwrap().anchor, DateAnchor::Current);
    }

    #[test]
    fn test_resolve_start_nodes() {
        let mut g = Graph::undirected();
        g.add_edge("x", "y").unwrap();
        g.add_node("z").unwrap();
        assert_eq!(resolve_start_nodes(&g, None).unwrap(), vec![0, 1, 2]);
        let names = vec!["z".to_string(), "x".to_string()];
        assert_eq!(resolve_start_nodes(&g, Some(&names)).unwrap(), vec![2, 0]);
        let missing = vec!["w".to_string()];
        assert!(resolve_start_nodes(&g, Some(&missing)).is_err());
    }
}
