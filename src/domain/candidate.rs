//! Candidate Records
//!
//! Intermediate records produced by the pipeline stages: momentum ranking
//! output and oracle-scored candidates. Both are created fresh per run and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Momentum ranking entry for one symbol.
///
/// `rank` is the 1-based position in the descending trailing-return sort,
/// ties broken by symbol ascending so identical inputs always produce
/// identical rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumRecord {
    pub symbol: String,
    /// Trailing price return over the lookback window, as a decimal
    /// (0.12 = +12%).
    pub trailing_return: f64,
    pub rank: usize,
}

impl MomentumRecord {
    pub fn new(symbol: impl Into<String>, trailing_return: f64, rank: usize) -> Self {
        Self {
            symbol: symbol.into(),
            trailing_return,
            rank,
        }
    }
}

/// A momentum survivor with its oracle score attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub symbol: String,
    pub momentum_return: f64,
    /// Composite quality score from the scoring oracle, clamped to [0, 1].
    pub ai_score: f64,
}

impl ScoredCandidate {
    pub fn new(symbol: impl Into<String>, momentum_return: f64, ai_score: f64) -> Self {
        Self {
            symbol: symbol.into(),
            momentum_return,
            ai_score,
        }
    }
}
