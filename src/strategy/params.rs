//! Strategy Parameters
//!
//! Configuration structs for the selection-and-weighting engine. Defaults
//! reproduce the reference setup: 12-month momentum excluding the most
//! recent month, top-20% retention, 50 names, tilt exponent 5.0.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Momentum lookback window in trading days (252 ~ 12 months)
    pub lookback_days: usize,
    /// Bars dropped from the end of each series before measuring momentum,
    /// to sidestep short-term reversal (21 ~ 1 month; 0 disables)
    pub exclude_recent_days: usize,
    /// Fraction of the eligible universe retained by the momentum screen,
    /// in (0, 1]
    pub top_percentile: f64,
    /// Number of names in the final portfolio
    pub portfolio_size: usize,
    /// Power applied to oracle scores before weight normalization; 0 gives
    /// an equal-weighted portfolio
    pub tilt_exponent: f64,
    /// Scoring-stage limits
    pub scoring: ScoringLimits,
}

/// Limits for the oracle fan-out stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringLimits {
    /// Maximum in-flight oracle calls
    pub concurrency_limit: usize,
    /// Per-call timeout in seconds; expiry counts as a scoring failure
    pub timeout_secs: u64,
    /// Fraction of retained symbols that may fail scoring before the whole
    /// run aborts, in (0, 1]
    pub max_failure_rate: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            lookback_days: 252,
            exclude_recent_days: 21,
            top_percentile: 0.20,
            portfolio_size: 50,
            tilt_exponent: 5.0,
            scoring: ScoringLimits::default(),
        }
    }
}

impl Default for ScoringLimits {
    fn default() -> Self {
        Self {
            concurrency_limit: 8,
            timeout_secs: 30,
            max_failure_rate: 0.5,
        }
    }
}

impl SelectionConfig {
    /// Create a new config with custom top percentile
    pub fn with_top_percentile(mut self, percentile: f64) -> Self {
        self.top_percentile = percentile;
        self
    }

    /// Create a new config with custom portfolio size
    pub fn with_portfolio_size(mut self, size: usize) -> Self {
        self.portfolio_size = size;
        self
    }

    /// Create a new config with custom tilt exponent
    pub fn with_tilt_exponent(mut self, exponent: f64) -> Self {
        self.tilt_exponent = exponent;
        self
    }

    /// Create a new config with custom lookback window
    pub fn with_lookback(mut self, days: usize) -> Self {
        self.lookback_days = days;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days == 0 {
            return Err(ConfigError::InvalidLookback(self.lookback_days));
        }
        if !(self.top_percentile > 0.0 && self.top_percentile <= 1.0) {
            return Err(ConfigError::InvalidPercentile(self.top_percentile));
        }
        if self.portfolio_size == 0 {
            return Err(ConfigError::InvalidPortfolioSize(self.portfolio_size));
        }
        if !(self.tilt_exponent >= 0.0) || !self.tilt_exponent.is_finite() {
            return Err(ConfigError::InvalidTiltExponent(self.tilt_exponent));
        }
        self.scoring.validate()?;
        Ok(())
    }
}

impl ScoringLimits {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_limit == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency_limit));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs));
        }
        if !(self.max_failure_rate > 0.0 && self.max_failure_rate <= 1.0) {
            return Err(ConfigError::InvalidFailureRate(self.max_failure_rate));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid lookback window: {0} days (must be > 0)")]
    InvalidLookback(usize),
    #[error("Invalid top percentile: {0} (must be in (0, 1])")]
    InvalidPercentile(f64),
    #[error("Invalid portfolio size: {0} (must be >= 1)")]
    InvalidPortfolioSize(usize),
    #[error("Invalid tilt exponent: {0} (must be finite and >= 0)")]
    InvalidTiltExponent(f64),
    #[error("Invalid concurrency limit: {0} (must be >= 1)")]
    InvalidConcurrency(usize),
    #[error("Invalid oracle timeout: {0}s (must be > 0)")]
    InvalidTimeout(u64),
    #[error("Invalid max failure rate: {0} (must be in (0, 1])")]
    InvalidFailureRate(f64),
}
