//! Momentum Screen
//!
//! Trailing-return computation and percentile retention. This is the first
//! pipeline stage: it turns raw price histories into a deterministic
//! descending ranking and keeps the top fraction of the eligible universe.
//!
//! Momentum formula: r = price_end / price_start - 1, measured over
//! `lookback_days` bars ending `exclude_recent_days` bars before the most
//! recent observation. Dropping the last month avoids the short-term
//! reversal effect.

use thiserror::Error;

use crate::domain::{ExclusionReason, MomentumRecord, PriceHistory};
use crate::strategy::params::SelectionConfig;

/// Per-symbol momentum computation errors; excluded from ranking, never
/// fatal to the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MomentumError {
    #[error("insufficient history: {have} of {need} bars")]
    InsufficientHistory { have: usize, need: usize },
    #[error("non-positive price at window endpoint")]
    NonPositivePrice,
}

impl From<MomentumError> for ExclusionReason {
    fn from(err: MomentumError) -> Self {
        match err {
            MomentumError::InsufficientHistory { have, need } => {
                ExclusionReason::InsufficientHistory { have, need }
            }
            MomentumError::NonPositivePrice => ExclusionReason::NonPositivePrice,
        }
    }
}

/// Result of screening a universe: the full ranking, the retained prefix
/// size, and the symbols that could not be ranked.
#[derive(Debug, Clone)]
pub struct MomentumScreen {
    /// All eligible symbols, descending by trailing return, rank 1-based.
    pub ranking: Vec<MomentumRecord>,
    /// Number of leading entries of `ranking` that survive the percentile
    /// cut: ceil(eligible * top_percentile).
    pub retained: usize,
    /// Symbols excluded before ranking, with reasons.
    pub exclusions: Vec<(String, MomentumError)>,
}

impl MomentumScreen {
    /// The survivors, in rank order.
    pub fn survivors(&self) -> &[MomentumRecord] {
        &self.ranking[..self.retained]
    }
}

/// Momentum percentile filter
#[derive(Debug, Clone)]
pub struct MomentumFilter {
    lookback_days: usize,
    exclude_recent_days: usize,
    top_percentile: f64,
}

impl MomentumFilter {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            lookback_days: config.lookback_days,
            exclude_recent_days: config.exclude_recent_days,
            top_percentile: config.top_percentile,
        }
    }

    /// Trailing return for one symbol.
    pub fn trailing_return(&self, history: &PriceHistory) -> Result<f64, MomentumError> {
        let closes: Vec<f64> = history.closes().collect();
        let usable = closes.len().saturating_sub(self.exclude_recent_days);
        if usable < self.lookback_days {
            return Err(MomentumError::InsufficientHistory {
                have: usable,
                need: self.lookback_days,
            });
        }

        let window = &closes[..usable];
        let start = window[window.len() - self.lookback_days];
        let end = window[window.len() - 1];
        if start <= 0.0 || end <= 0.0 {
            return Err(MomentumError::NonPositivePrice);
        }

        Ok(end / start - 1.0)
    }

    /// Rank a universe and apply the percentile cut.
    ///
    /// The retained count is computed against the eligible count (symbols
    /// that produced a return), not the raw universe, so per-symbol
    /// exclusions never silently shrink the retention target.
    pub fn screen(&self, universe: &[PriceHistory]) -> MomentumScreen {
        let mut returns: Vec<(String, f64)> = Vec::with_capacity(universe.len());
        let mut exclusions = Vec::new();

        for history in universe {
            match self.trailing_return(history) {
                Ok(value) => returns.push((history.symbol.clone(), value)),
                Err(err) => {
                    tracing::debug!(symbol = %history.symbol, reason = %err, "excluded from momentum ranking");
                    exclusions.push((history.symbol.clone(), err));
                }
            }
        }

        // Descending by return, ties by symbol ascending: a total order, so
        // reordering the input universe cannot change the ranking.
        returns.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let ranking: Vec<MomentumRecord> = returns
            .into_iter()
            .enumerate()
            .map(|(i, (symbol, value))| MomentumRecord::new(symbol, value, i + 1))
            .collect();

        let retained = retention_target(ranking.len(), self.top_percentile);

        MomentumScreen {
            ranking,
            retained,
            exclusions,
        }
    }
}

/// ceil(eligible * percentile), with a tolerance so exact products are not
/// bumped up by binary rounding (5 * 0.4 must stay 2, not become 3).
fn retention_target(eligible: usize, percentile: f64) -> usize {
    if eligible == 0 {
        return 0;
    }
    let raw = eligible as f64 * percentile;
    let target = if (raw - raw.round()).abs() < 1e-9 {
        raw.round() as usize
    } else {
        raw.ceil() as usize
    };
    target.min(eligible)
}
