//! Paper-Mode Simulators
//!
//! Seeded, offline stand-ins for the three external collaborators so
//! `generate --paper` exercises the whole pipeline without market data or
//! a scoring endpoint. Same seed, same portfolio.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{PriceHistory, PricePoint};
use crate::ports::features::{FeatureBundle, FeatureError, FeatureFetcher};
use crate::ports::oracle::{OracleError, ScoringOracle};
use crate::ports::universe::{UniverseError, UniverseProvider};

fn symbol_seed(seed: u64, symbol: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    symbol.hash(&mut hasher);
    seed ^ hasher.finish()
}

/// Random-walk universe with per-symbol drift
#[derive(Debug, Clone)]
pub struct SimulatedUniverse {
    symbols: Vec<String>,
    bars: usize,
    seed: u64,
}

impl SimulatedUniverse {
    pub fn new(symbols: Vec<String>, bars: usize, seed: u64) -> Self {
        Self {
            symbols,
            bars,
            seed,
        }
    }

    /// A default ticker set sized for demos.
    pub fn demo(seed: u64) -> Self {
        let symbols = [
            "AAPL", "AMZN", "AVGO", "BRK.B", "GOOG", "JNJ", "JPM", "LLY", "MA", "META", "MSFT",
            "NVDA", "PG", "TSLA", "UNH", "V", "WMT", "XOM",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Self::new(symbols, 300, seed)
    }

    fn walk(&self, symbol: &str) -> PriceHistory {
        let mut rng = StdRng::seed_from_u64(symbol_seed(self.seed, symbol));
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let drift: f64 = rng.gen_range(-0.001..0.002);
        let volatility: f64 = rng.gen_range(0.01..0.03);
        let mut price: f64 = rng.gen_range(20.0..400.0);

        let mut points = Vec::with_capacity(self.bars);
        for i in 0..self.bars {
            let shock: f64 = rng.gen_range(-1.0..1.0);
            price *= 1.0 + drift + volatility * shock;
            price = price.max(0.01);
            points.push(PricePoint::new(start + Duration::days(i as i64), price));
        }
        PriceHistory::from_points(symbol, points)
    }
}

#[async_trait]
impl UniverseProvider for SimulatedUniverse {
    async fn list_universe(&self) -> Result<Vec<PriceHistory>, UniverseError> {
        Ok(self.symbols.iter().map(|s| self.walk(s)).collect())
    }
}

/// Deterministic pseudo-fundamentals keyed by symbol
#[derive(Debug, Clone)]
pub struct SimFeatureFetcher {
    seed: u64,
}

impl SimFeatureFetcher {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl FeatureFetcher for SimFeatureFetcher {
    async fn fetch_features(&self, symbol: &str) -> Result<FeatureBundle, FeatureError> {
        let mut rng = StdRng::seed_from_u64(symbol_seed(self.seed, symbol));
        let mut bundle = FeatureBundle::new(symbol);
        bundle.earnings_growth = Some(rng.gen_range(-0.30..0.50));
        bundle.margins = Some(rng.gen_range(0.0..0.40));
        bundle.leverage = Some(rng.gen_range(0.0..3.0));
        bundle.news_sentiment = Some(rng.gen_range(-1.0..1.0));
        Ok(bundle)
    }
}

/// Rule-based oracle: a fixed linear blend of the bundle squashed into
/// [0, 1]. Good growth, fat margins, light leverage, and friendly news
/// push the score up.
#[derive(Debug, Clone, Default)]
pub struct HeuristicOracle;

impl HeuristicOracle {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScoringOracle for HeuristicOracle {
    async fn score(&self, bundle: &FeatureBundle) -> Result<f64, OracleError> {
        let growth = bundle.earnings_growth.unwrap_or(0.0);
        let margins = bundle.margins.unwrap_or(0.15);
        let leverage = bundle.leverage.unwrap_or(1.0);
        let sentiment = bundle.news_sentiment.unwrap_or(0.0);

        let raw = 1.2 * growth + 1.5 * (margins - 0.15) - 0.3 * (leverage - 1.0) + 0.8 * sentiment;
        // Logistic squash keeps the contract range without hard clipping.
        let score = 1.0 / (1.0 + (-raw).exp());
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_universe_is_deterministic() {
        let first = SimulatedUniverse::demo(42).list_universe().await.unwrap();
        let second = SimulatedUniverse::demo(42).list_universe().await.unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.symbol, b.symbol);
            assert_eq!(a.points(), b.points());
        }
    }

    #[tokio::test]
    async fn test_different_seeds_differ() {
        let first = SimulatedUniverse::demo(1).list_universe().await.unwrap();
        let second = SimulatedUniverse::demo(2).list_universe().await.unwrap();
        assert_ne!(first[0].points(), second[0].points());
    }

    #[tokio::test]
    async fn test_heuristic_score_in_range() {
        let fetcher = SimFeatureFetcher::new(7);
        let oracle = HeuristicOracle::new();
        for symbol in ["AAPL", "MSFT", "NVDA", "XOM"] {
            let bundle = fetcher.fetch_features(symbol).await.unwrap();
            let score = oracle.score(&bundle).await.unwrap();
            assert!((0.0..=1.0).contains(&score), "{} scored {}", symbol, score);
        }
    }

    #[tokio::test]
    async fn test_heuristic_prefers_stronger_fundamentals() {
        let oracle = HeuristicOracle::new();
        let mut strong = FeatureBundle::new("GOOD");
        strong.earnings_growth = Some(0.40);
        strong.margins = Some(0.35);
        strong.leverage = Some(0.2);
        strong.news_sentiment = Some(0.8);

        let mut weak = FeatureBundle::new("POOR");
        weak.earnings_growth = Some(-0.25);
        weak.margins = Some(0.02);
        weak.leverage = Some(2.8);
        weak.news_sentiment = Some(-0.7);

        let high = oracle.score(&strong).await.unwrap();
        let low = oracle.score(&weak).await.unwrap();
        assert!(high > low);
    }
}
