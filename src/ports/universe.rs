//! Universe Provider Port
//!
//! Supplies the full candidate universe with trailing price series. The
//! engine only requires that every history is ascending by timestamp;
//! where the symbols come from (index membership file, vendor API, cached
//! CSVs) is an adapter concern.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::PriceHistory;

/// Universe retrieval error type
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("Universe unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed price data for {symbol}: {reason}")]
    MalformedData { symbol: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Universe provider port trait
#[async_trait]
pub trait UniverseProvider: Send + Sync {
    /// Fetch the full universe with price histories.
    ///
    /// Duplicate symbols are an adapter bug; the pipeline deduplicates by
    /// keeping the first occurrence and keys all downstream work by symbol.
    async fn list_universe(&self) -> Result<Vec<PriceHistory>, UniverseError>;
}
