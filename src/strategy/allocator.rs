//! Weight Allocator
//!
//! Converts the ranked candidate list into normalized portfolio weights
//! via a power-law tilt: raw_weight = ai_score^p, then normalize. The
//! exponent p is the system's single concentration knob: p = 0 is equal
//! weight, large p concentrates on the top-scored names, and the formula
//! stays simple enough to recompute by hand.

use crate::domain::{Portfolio, PortfolioEntry, ScoredCandidate};
use crate::strategy::params::SelectionConfig;

/// Weight-sum tolerance; holds for at least 500 names with pairwise
/// accumulation.
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Outcome of an allocation pass.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub portfolio: Portfolio,
    /// Equal-weight fallback was applied because every raw weight was zero.
    pub degenerate: bool,
}

/// Power-law weight allocator
#[derive(Debug, Clone)]
pub struct WeightAllocator {
    tilt_exponent: f64,
}

impl WeightAllocator {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            tilt_exponent: config.tilt_exponent,
        }
    }

    /// Allocate weights over the ranked candidates, preserving their order.
    pub fn allocate(&self, ranked: &[ScoredCandidate]) -> Allocation {
        if ranked.is_empty() {
            return Allocation {
                portfolio: Portfolio::default(),
                degenerate: false,
            };
        }

        let raw: Vec<f64> = ranked
            .iter()
            .map(|c| c.ai_score.powf(self.tilt_exponent))
            .collect();
        let total = pairwise_sum(&raw);

        let (weights, degenerate) = if total > 0.0 {
            (raw.iter().map(|r| r / total).collect::<Vec<f64>>(), false)
        } else {
            // All scores zero: normalization would divide by zero, so fall
            // back to equal weight across the selection.
            tracing::warn!(
                candidates = ranked.len(),
                "all raw weights zero, applying equal-weight fallback"
            );
            (vec![1.0 / ranked.len() as f64; ranked.len()], true)
        };

        let weights = renormalize_if_drifted(weights);

        let entries = ranked
            .iter()
            .zip(weights)
            .map(|(c, weight)| {
                PortfolioEntry::new(c.symbol.clone(), weight, c.momentum_return, c.ai_score)
            })
            .collect();

        Allocation {
            portfolio: Portfolio::new(entries),
            degenerate,
        }
    }
}

/// Pairwise (cascade) summation. Error grows O(log n) instead of O(n),
/// which keeps 500-name weight sums inside the 1e-6 contract.
pub fn pairwise_sum(values: &[f64]) -> f64 {
    const LEAF: usize = 32;
    if values.len() <= LEAF {
        return values.iter().sum();
    }
    let mid = values.len() / 2;
    pairwise_sum(&values[..mid]) + pairwise_sum(&values[mid..])
}

fn renormalize_if_drifted(weights: Vec<f64>) -> Vec<f64> {
    let sum = pairwise_sum(&weights);
    if (sum - 1.0).abs() <= WEIGHT_SUM_EPSILON {
        return weights;
    }
    tracing::warn!(sum, "weight sum drifted, renormalizing");
    weights.into_iter().map(|w| w / sum).collect()
}
