//! Walk policies
//!
//! A policy is a transition bias (uniform, node2vec, restart) plus an
//! optional temporal rule that restricts which neighbors are eligible.

use crate::csr::CsrStore;
use crate::error::{WalkError, WalkResult};

/// How the next node is chosen among eligible neighbors
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalkBias {
    /// Draw proportionally to edge weight
    Uniform,
    /// Second-order walk with return parameter `p` and in-out parameter `q`
    Node2Vec { p: f32, q: f32 },
    /// Teleport back to the start node with probability `alpha` per step.
    ///
    /// Under a temporal rule the teleport is gated like any other move: if
    /// the start node is not admitted the walk takes a regular step instead.
    Restart { alpha: f32 },
}

/// Which date gates a candidate neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateAnchor {
    /// Compare against the walk's start node for every step
    #[default]
    Start,
    /// Compare against the current node, so dates never increase along the walk
    Current,
}

/// "No future" constraint for temporal graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemporalRule {
    pub anchor: DateAnchor,
    /// Accept `date == anchor date` as well (`<=` instead of `<`)
    pub inclusive: bool,
}

impl TemporalRule {
    #[inline]
    pub fn admits(&self, candidate_date: f32, anchor_date: f32) -> bool {
        if self.inclusive {
            candidate_date <= anchor_date
        } else {
            candidate_date < anchor_date
        }
    }
}

/// Complete walk policy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkPolicy {
    pub bias: WalkBias,
    pub temporal: Option<TemporalRule>,
}

impl Default for WalkPolicy {
    fn default() -> Self {
        Self::uniform()
    }
}

impl WalkPolicy {
    pub fn uniform() -> Self {
        Self {
            bias: WalkBias::Uniform,
            temporal: None,
        }
    }

    pub fn node2vec(p: f32, q: f32) -> Self {
        Self {
            bias: WalkBias::Node2Vec { p, q },
            temporal: None,
        }
    }

    pub fn restart(alpha: f32) -> Self {
        Self {
            bias: WalkBias::Restart { alpha },
            temporal: None,
        }
    }

    /// Only step to neighbors dated strictly before the start node
    pub fn no_future(self) -> Self {
        self.with_temporal(TemporalRule::default())
    }

    pub fn with_temporal(mut self, rule: TemporalRule) -> Self {
        self.temporal = Some(rule);
        self
    }

    /// Pick a policy from the classic keyword parameters.
    ///
    /// `p == q == 1` selects a first-order walk (uniform, or restart when
    /// `alpha > 0`); anything else selects node2vec. Restart and node2vec
    /// bias cannot be combined.
    pub fn from_params(p: f32, q: f32, alpha: f32, no_future: bool) -> WalkResult<Self> {
        let policy = if p == 1.0 && q == 1.0 {
            if alpha == 0.0 {
                Self::uniform()
            } else {
                Self::restart(alpha)
            }
        } else if alpha != 0.0 {
            return Err(WalkError::InvalidParameter(format!(
                "restart probability {} cannot be combined with node2vec bias (p={}, q={})",
                alpha, p, q
            )));
        } else {
            Self::node2vec(p, q)
        };

        Ok(if no_future { policy.no_future() } else { policy })
    }

    /// Check numeric ranges and required node attributes against a store.
    pub fn validate(&self, store: &CsrStore) -> WalkResult<()> {
        match self.bias {
            WalkBias::Uniform => {}
            WalkBias::Node2Vec { p, q } => {
                if !(p.is_finite() && p > 0.0) {
                    return Err(WalkError::InvalidParameter(format!(
                        "return parameter p must be positive and finite, got {}",
                        p
                    )));
                }
                if !(q.is_finite() && q > 0.0) {
                    return Err(WalkError::InvalidParameter(format!(
                        "in-out parameter q must be positive and finite, got {}",
                        q
                    )));
                }
            }
            WalkBias::Restart { alpha } => {
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(WalkError::InvalidParameter(format!(
                        "restart probability alpha must be in [0, 1], got {}",
                        alpha
                    )));
                }
            }
        }

        if self.temporal.is_some() {
            let dates = store.dates().ok_or_else(|| {
                WalkError::MissingAttribute("temporal walk requires node dates".to_string())
            })?;
            if dates.len() != store.node_count() {
                return Err(WalkError::MissingAttribute(format!(
                    "expected {} node dates, got {}",
                    store.node_count(),
                    dates.len()
                )));
            }
            if let Some(node) = dates.iter().position(|d| d.is_nan()) {
                return Err(WalkError::MissingAttribute(format!(
                    "node {} has no date",
                    node
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_params_dispatch() {
        assert_eq!(WalkPolicy::from_params(1.0, 1.0, 0.0, false).unwrap(), WalkPolicy::uniform());
        assert_eq!(
            WalkPolicy::from_params(1.0, 1.0, 0.3, false).unwrap(),
            WalkPolicy::restart(0.3)
        );
        assert_eq!(
            WalkPolicy::from_params(0.5, 2.0, 0.0, true).unwrap(),
            WalkPolicy::node2vec(0.5, 2.0).no_future()
        );
        assert!(matches!(
            WalkPolicy::from_params(0.5, 1.0, 0.2, false),
            Err(WalkError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_temporal_rule_comparison() {
        let strict = TemporalRule::default();
        assert!(strict.admits(1.0, 2.0));
        assert!(!strict.admits(2.0, 2.0));

        let inclusive = TemporalRule { inclusive: true, ..Default::default() };
        assert!(inclusive.admits(2.0, 2.0));
        assert!(!inclusive.admits(2.5, 2.0));
    }

    #[test]
    fn test_validate_requires_dates() {
        let store = CsrStore::from_adjacency_list(vec![vec![(1, 1.0)], vec![(0, 1.0)]]).unwrap();
        let policy = WalkPolicy::uniform().no_future();
        assert!(matches!(policy.validate(&store), Err(WalkError::MissingAttribute(_))));

        let store = store.with_dates(vec![1.0, f32::NAN]);
        assert!(matches!(policy.validate(&store), Err(WalkError::MissingAttribute(_))));
    }

    #[test]
    fn test_validate_ranges() {
        let store = CsrStore::from_adjacency_list(vec![vec![]]).unwrap();
        assert!(WalkPolicy::restart(1.0).validate(&store).is_ok());
        assert!(WalkPolicy::restart(1.5).validate(&store).is_err());
        assert!(WalkPolicy::node2vec(0.0, 1.0).validate(&store).is_err());
        assert!(WalkPolicy::node2vec(1.0, f32::INFINITY).validate(&store).is_err());
    }
}
