//! Scoring Oracle Port
//!
//! Maps a feature bundle to a scalar quality score in [0, 1]. The oracle
//! is a remote, metered dependency: calls can be slow, can fail, and cost
//! money, so the pipeline bounds concurrency, applies a per-call timeout,
//! and never retries at this layer. Any conforming provider works:
//! rule-based, ML-model-based, or remote-LLM-based.

use async_trait::async_trait;
use thiserror::Error;

use crate::ports::features::FeatureBundle;

/// Oracle call error type
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unparseable oracle response: {0}")]
    InvalidResponse(String),
}

/// Scoring oracle port trait
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    /// Score one candidate. The contract is a value in [0, 1]; the
    /// aggregation layer clamps anything outside that range and logs it
    /// rather than failing the run.
    async fn score(&self, bundle: &FeatureBundle) -> Result<f64, OracleError>;
}
