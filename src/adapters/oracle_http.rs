//! HTTP Scoring Oracle
//!
//! Remote scoring backend client: POSTs the feature bundle as JSON and
//! expects `{"score": <float>}` back. Retries are deliberately absent:
//! the pipeline treats a failed call as a per-symbol exclusion and keeps
//! its oracle spend predictable; a backend that wants retries implements
//! them behind its own endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::ports::features::FeatureBundle;
use crate::ports::oracle::{OracleError, ScoringOracle};

/// HTTP oracle client configuration
#[derive(Debug, Clone)]
pub struct HttpOracleConfig {
    /// Scoring endpoint URL
    pub endpoint: String,
    /// Optional API key, sent as `x-api-key`
    pub api_key: Option<String>,
    /// Client-level request timeout
    pub timeout: Duration,
}

impl Default for HttpOracleConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    score: f64,
}

/// Remote scoring oracle over HTTP
#[derive(Debug, Clone)]
pub struct HttpScoringOracle {
    config: HttpOracleConfig,
    http: Client,
}

impl HttpScoringOracle {
    pub fn new(config: HttpOracleConfig) -> Result<Self, OracleError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Transport(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl ScoringOracle for HttpScoringOracle {
    async fn score(&self, bundle: &FeatureBundle) -> Result<f64, OracleError> {
        let mut request = self.http.post(&self.config.endpoint).json(bundle);
        if let Some(ref api_key) = self.config.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ScoreResponse = response
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;
        Ok(parsed.score)
    }
}
