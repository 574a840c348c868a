//! HTTP Feature Fetcher
//!
//! Client for a research-data service exposing per-symbol fundamentals and
//! news sentiment at `GET {endpoint}/{symbol}`, returning a FeatureBundle
//! as JSON. Failures are per-symbol and surface as non-fatal exclusions in
//! the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::ports::features::{FeatureBundle, FeatureError, FeatureFetcher};

/// HTTP feature client configuration
#[derive(Debug, Clone)]
pub struct HttpFeatureConfig {
    /// Base URL of the feature service
    pub endpoint: String,
    /// Optional API key, sent as `x-api-key`
    pub api_key: Option<String>,
    /// Client-level request timeout
    pub timeout: Duration,
}

/// Remote feature fetcher over HTTP
#[derive(Debug, Clone)]
pub struct HttpFeatureFetcher {
    config: HttpFeatureConfig,
    http: Client,
}

impl HttpFeatureFetcher {
    pub fn new(config: HttpFeatureConfig) -> Result<Self, FeatureError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FeatureError::FetchFailed {
                symbol: String::new(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl FeatureFetcher for HttpFeatureFetcher {
    async fn fetch_features(&self, symbol: &str) -> Result<FeatureBundle, FeatureError> {
        let url = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), symbol);
        let mut request = self.http.get(&url);
        if let Some(ref api_key) = self.config.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await.map_err(|e| FeatureError::FetchFailed {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FeatureError::NoData(symbol.to_string()));
        }
        if !response.status().is_success() {
            return Err(FeatureError::FetchFailed {
                symbol: symbol.to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        response.json().await.map_err(|e| FeatureError::FetchFailed {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let fetcher = HttpFeatureFetcher::new(HttpFeatureConfig {
            endpoint: "https://research.example.com/v1/features".to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        });
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_bundle_deserializes_from_wire() {
        let bundle: FeatureBundle = serde_json::from_str(
            r#"{"symbol":"AAPL","earnings_growth":0.12,"margins":0.25,"leverage":1.4,"news_sentiment":0.3,"news_summary":null}"#,
        )
        .unwrap();
        assert_eq!(bundle.symbol, "AAPL");
        assert_eq!(bundle.margins, Some(0.25));
    }
}
