//! Run Audit Summary
//!
//! Every pipeline run produces a RunSummary alongside the portfolio so
//! operators can audit data completeness. A symbol is never dropped without
//! a reason recorded here.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a symbol was excluded from the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// Price series shorter than the lookback window.
    InsufficientHistory { have: usize, need: usize },
    /// Window endpoint price was zero or negative; no return defined.
    NonPositivePrice,
    /// Feature fetcher failed for this symbol.
    FeatureFetchFailed(String),
    /// Oracle call failed or timed out.
    ScoringFailed(String),
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::InsufficientHistory { have, need } => {
                write!(f, "insufficient history ({} of {} bars)", have, need)
            }
            ExclusionReason::NonPositivePrice => write!(f, "non-positive price"),
            ExclusionReason::FeatureFetchFailed(reason) => {
                write!(f, "feature fetch failed: {}", reason)
            }
            ExclusionReason::ScoringFailed(reason) => write!(f, "scoring failed: {}", reason),
        }
    }
}

impl ExclusionReason {
    /// Stable bucket name for count aggregation.
    pub fn kind(&self) -> &'static str {
        match self {
            ExclusionReason::InsufficientHistory { .. } => "insufficient_history",
            ExclusionReason::NonPositivePrice => "non_positive_price",
            ExclusionReason::FeatureFetchFailed(_) => "feature_fetch_failed",
            ExclusionReason::ScoringFailed(_) => "scoring_failed",
        }
    }
}

/// Per-run accounting of what went in, what fell out, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub initial_universe: usize,
    /// Symbols with enough history to produce a trailing return.
    pub eligible: usize,
    /// Momentum survivors handed to the scoring stage.
    pub retained: usize,
    /// Candidates that received an oracle score.
    pub scored: usize,
    /// Oracle scores that fell outside [0, 1] and were clamped.
    pub clamped_scores: usize,
    /// Equal-weight fallback was applied because every score was zero.
    pub degenerate_weights: bool,
    pub final_selected: usize,
    pub exclusions: Vec<(String, ExclusionReason)>,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>, initial_universe: usize) -> Self {
        Self {
            started_at,
            initial_universe,
            eligible: 0,
            retained: 0,
            scored: 0,
            clamped_scores: 0,
            degenerate_weights: false,
            final_selected: 0,
            exclusions: Vec::new(),
        }
    }

    pub fn exclude(&mut self, symbol: impl Into<String>, reason: ExclusionReason) {
        self.exclusions.push((symbol.into(), reason));
    }

    /// Exclusion counts bucketed by reason kind, alphabetical.
    pub fn exclusion_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for (_, reason) in &self.exclusions {
            *counts.entry(reason.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Symbols lost to oracle-stage failures (fetch or score).
    pub fn scoring_failures(&self) -> usize {
        self.exclusions
            .iter()
            .filter(|(_, r)| {
                matches!(
                    r,
                    ExclusionReason::FeatureFetchFailed(_) | ExclusionReason::ScoringFailed(_)
                )
            })
            .count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Selection run {}", self.started_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "  Initial universe:   {:>6}", self.initial_universe)?;
        writeln!(f, "  Eligible (history): {:>6}", self.eligible)?;
        writeln!(f, "  Momentum survivors: {:>6}", self.retained)?;
        writeln!(f, "  Scored:             {:>6}", self.scored)?;
        writeln!(f, "  Final selected:     {:>6}", self.final_selected)?;
        if self.clamped_scores > 0 {
            writeln!(f, "  Clamped scores:     {:>6}", self.clamped_scores)?;
        }
        if self.degenerate_weights {
            writeln!(f, "  Weights: equal-weight fallback (all scores zero)")?;
        }
        if !self.exclusions.is_empty() {
            writeln!(f, "  Exclusions:")?;
            for (kind, count) in self.exclusion_counts() {
                writeln!(f, "    {:<22} {:>5}", kind, count)?;
            }
        }
        Ok(())
    }
}
