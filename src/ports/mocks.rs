use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::PriceHistory;
use crate::ports::features::{FeatureBundle, FeatureError, FeatureFetcher};
use crate::ports::oracle::{OracleError, ScoringOracle};
use crate::ports::universe::{UniverseError, UniverseProvider};

/// Mock universe provider with a fixed set of histories
#[derive(Debug, Default)]
pub struct MockUniverse {
    histories: Vec<PriceHistory>,
    fail: Option<String>,
}

impl MockUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a price history
    pub fn with_history(mut self, history: PriceHistory) -> Self {
        self.histories.push(history);
        self
    }

    /// Builder method to make list_universe fail
    pub fn with_failure(mut self, reason: &str) -> Self {
        self.fail = Some(reason.to_string());
        self
    }
}

#[async_trait]
impl UniverseProvider for MockUniverse {
    async fn list_universe(&self) -> Result<Vec<PriceHistory>, UniverseError> {
        if let Some(reason) = &self.fail {
            return Err(UniverseError::Unavailable(reason.clone()));
        }
        Ok(self.histories.clone())
    }
}

/// Mock feature fetcher that records calls and allows scripted failures
#[derive(Debug, Default)]
pub struct MockFeatureFetcher {
    calls: Arc<Mutex<Vec<String>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
}

impl MockFeatureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to make fetches for a symbol fail
    pub fn with_failure(self, symbol: &str, reason: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(symbol.to_string(), reason.to_string());
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeatureFetcher for MockFeatureFetcher {
    async fn fetch_features(&self, symbol: &str) -> Result<FeatureBundle, FeatureError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if let Some(reason) = self.failures.lock().unwrap().get(symbol) {
            return Err(FeatureError::FetchFailed {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(FeatureBundle::new(symbol))
    }
}

/// Mock scoring oracle with per-symbol scores, scripted failures, and an
/// optional artificial delay for timeout tests
#[derive(Debug, Default)]
pub struct MockOracle {
    calls: Arc<Mutex<Vec<String>>>,
    scores: Arc<Mutex<HashMap<String, f64>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    delay: Option<Duration>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the score for a symbol
    pub fn with_score(self, symbol: &str, score: f64) -> Self {
        self.scores
            .lock()
            .unwrap()
            .insert(symbol.to_string(), score);
        self
    }

    /// Builder method to make scoring a symbol fail
    pub fn with_failure(self, symbol: &str, reason: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(symbol.to_string(), reason.to_string());
        self
    }

    /// Builder method to delay every call (for timeout tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made for a given symbol
    pub fn call_count(&self, symbol: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.as_str() == symbol)
            .count()
    }
}

#[async_trait]
impl ScoringOracle for MockOracle {
    async fn score(&self, bundle: &FeatureBundle) -> Result<f64, OracleError> {
        self.calls.lock().unwrap().push(bundle.symbol.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = self.failures.lock().unwrap().get(&bundle.symbol) {
            return Err(OracleError::Transport(reason.clone()));
        }
        self.scores
            .lock()
            .unwrap()
            .get(&bundle.symbol)
            .copied()
            .ok_or_else(|| OracleError::InvalidResponse("no score configured".to_string()))
    }
}
