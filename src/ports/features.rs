//! Feature Fetcher Port
//!
//! Supplies the per-symbol fundamentals and news bundle consumed by the
//! scoring oracle. The engine treats the bundle as opaque cargo: it is
//! fetched once per retained symbol and handed to the oracle unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Feature retrieval error type
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Fetch failed for {symbol}: {reason}")]
    FetchFailed { symbol: String, reason: String },

    #[error("No data available for {0}")]
    NoData(String),
}

/// Fundamentals and sentiment inputs for one symbol.
///
/// All fields besides the symbol are optional; providers fill what they
/// have and the oracle decides how to treat gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    pub symbol: String,
    /// Year-over-year earnings growth, decimal.
    pub earnings_growth: Option<f64>,
    /// Net margin, decimal.
    pub margins: Option<f64>,
    /// Debt-to-equity or comparable leverage metric.
    pub leverage: Option<f64>,
    /// Aggregate news sentiment in [-1, 1].
    pub news_sentiment: Option<f64>,
    /// Condensed recent-news text for prompt-style oracles.
    pub news_summary: Option<String>,
}

impl FeatureBundle {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }
}

/// Feature fetcher port trait
#[async_trait]
pub trait FeatureFetcher: Send + Sync {
    /// Fetch the feature bundle for one symbol. Failures are per-symbol
    /// and non-fatal to a pipeline run.
    async fn fetch_features(&self, symbol: &str) -> Result<FeatureBundle, FeatureError>;
}
