//! Selection Pipeline
//!
//! Coordinates one full portfolio-construction run:
//! universe -> momentum screen -> feature fetch + oracle scoring ->
//! selection -> weight allocation.
//!
//! The scoring stage is the only concurrent one: the oracle is a remote,
//! metered dependency, so calls are bounded by a concurrency limit, capped
//! by a per-call timeout, and never retried here. Every other stage is a
//! pure in-memory transform.
//!
//! Cancellation: dropping the `run` future at any await point abandons the
//! run. The portfolio is materialized only after all stages complete, so a
//! cancelled run never yields a partial entry set.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::StreamExt;
use thiserror::Error;

use crate::domain::{ExclusionReason, MomentumRecord, Portfolio, RunSummary, ScoredCandidate};
use crate::ports::{FeatureFetcher, ScoringOracle, UniverseError, UniverseProvider};
use crate::strategy::{ConfigError, MomentumFilter, SelectionConfig, Selector, WeightAllocator};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Universe error: {0}")]
    Universe(#[from] UniverseError),
    #[error(
        "Scoring failure rate {rate:.2} exceeds limit {limit:.2} ({failed} of {retained} symbols failed)"
    )]
    FailureRateExceeded {
        failed: usize,
        retained: usize,
        rate: f64,
        limit: f64,
    },
}

/// Result of a completed run: the portfolio plus its audit trail.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub portfolio: Portfolio,
    pub summary: RunSummary,
}

enum ScoreOutcome {
    Scored { record: MomentumRecord, raw: f64 },
    Excluded { symbol: String, reason: ExclusionReason },
}

/// One-shot portfolio construction pipeline over pluggable providers.
pub struct SelectionPipeline {
    config: SelectionConfig,
    universe: Arc<dyn UniverseProvider>,
    features: Arc<dyn FeatureFetcher>,
    oracle: Arc<dyn ScoringOracle>,
}

impl SelectionPipeline {
    /// Create a pipeline. Configuration is validated here so an invalid
    /// setup aborts before any provider is touched.
    pub fn new(
        config: SelectionConfig,
        universe: Arc<dyn UniverseProvider>,
        features: Arc<dyn FeatureFetcher>,
        oracle: Arc<dyn ScoringOracle>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            universe,
            features,
            oracle,
        })
    }

    /// Execute one full selection run.
    pub async fn run(&self) -> Result<RunOutput, PipelineError> {
        let histories = self.universe.list_universe().await?;
        let mut summary = RunSummary::new(chrono::Utc::now(), histories.len());

        // The working set is keyed by symbol; a provider that repeats a
        // symbol contributes only its first history.
        let mut seen = HashSet::new();
        let histories: Vec<_> = histories
            .into_iter()
            .filter(|h| {
                let fresh = seen.insert(h.symbol.clone());
                if !fresh {
                    tracing::warn!(symbol = %h.symbol, "duplicate symbol in universe, keeping first");
                }
                fresh
            })
            .collect();

        tracing::info!(universe = histories.len(), "starting selection run");

        // Stage 1: momentum screen.
        let screen = MomentumFilter::new(&self.config).screen(&histories);
        summary.eligible = screen.ranking.len();
        summary.retained = screen.retained;
        for (symbol, err) in &screen.exclusions {
            summary.exclude(symbol.clone(), err.clone().into());
        }
        tracing::info!(
            eligible = summary.eligible,
            retained = summary.retained,
            "momentum screen complete"
        );

        // Stage 2: bounded concurrent feature fetch + oracle scoring.
        let outcomes = self.score_survivors(screen.survivors()).await;

        let mut candidates = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                ScoreOutcome::Scored { record, raw } => {
                    let score = if (0.0..=1.0).contains(&raw) {
                        raw
                    } else {
                        tracing::warn!(
                            symbol = %record.symbol,
                            raw,
                            "oracle score out of range, clamping"
                        );
                        summary.clamped_scores += 1;
                        raw.clamp(0.0, 1.0)
                    };
                    candidates.push(ScoredCandidate::new(
                        record.symbol,
                        record.trailing_return,
                        score,
                    ));
                }
                ScoreOutcome::Excluded { symbol, reason } => {
                    tracing::warn!(symbol = %symbol, reason = %reason, "symbol dropped at scoring stage");
                    summary.exclude(symbol, reason);
                }
            }
        }
        summary.scored = candidates.len();

        // Completion order of the fan-out is nondeterministic; keep the
        // audit trail reproducible.
        summary.exclusions.sort_by(|a, b| a.0.cmp(&b.0));

        // A mostly-failed scoring stage would yield a portfolio built from
        // statistical noise; abort instead.
        let failed = summary.retained.saturating_sub(summary.scored);
        if summary.retained > 0 {
            let rate = failed as f64 / summary.retained as f64;
            let limit = self.config.scoring.max_failure_rate;
            if rate > limit {
                return Err(PipelineError::FailureRateExceeded {
                    failed,
                    retained: summary.retained,
                    rate,
                    limit,
                });
            }
        }

        // Stages 3 and 4: pure transforms.
        let ranked = Selector::new(&self.config).select(candidates);
        summary.final_selected = ranked.len();

        let allocation = WeightAllocator::new(&self.config).allocate(&ranked);
        summary.degenerate_weights = allocation.degenerate;

        tracing::info!(
            selected = summary.final_selected,
            scored = summary.scored,
            excluded = summary.exclusions.len(),
            "selection run complete"
        );

        Ok(RunOutput {
            portfolio: allocation.portfolio,
            summary,
        })
    }

    async fn score_survivors(&self, survivors: &[MomentumRecord]) -> Vec<ScoreOutcome> {
        let timeout = self.config.scoring.timeout();
        futures::stream::iter(survivors.iter().cloned().map(|record| {
            let features = Arc::clone(&self.features);
            let oracle = Arc::clone(&self.oracle);
            async move {
                let bundle = match features.fetch_features(&record.symbol).await {
                    Ok(bundle) => bundle,
                    Err(err) => {
                        return ScoreOutcome::Excluded {
                            symbol: record.symbol,
                            reason: ExclusionReason::FeatureFetchFailed(err.to_string()),
                        }
                    }
                };
                match tokio::time::timeout(timeout, oracle.score(&bundle)).await {
                    Err(_) => ScoreOutcome::Excluded {
                        symbol: record.symbol,
                        reason: ExclusionReason::ScoringFailed(format!(
                            "timed out after {:?}",
                            timeout
                        )),
                    },
                    Ok(Err(err)) => ScoreOutcome::Excluded {
                        symbol: record.symbol,
                        reason: ExclusionReason::ScoringFailed(err.to_string()),
                    },
                    Ok(Ok(raw)) if !raw.is_finite() => ScoreOutcome::Excluded {
                        symbol: record.symbol,
                        reason: ExclusionReason::ScoringFailed("non-finite score".to_string()),
                    },
                    Ok(Ok(raw)) => ScoreOutcome::Scored { record, raw },
                }
            }
        }))
        .buffer_unordered(self.config.scoring.concurrency_limit)
        .collect()
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PriceHistory, PricePoint};
    use crate::ports::mocks::{MockFeatureFetcher, MockOracle, MockUniverse};
    use approx::assert_relative_eq;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use std::time::Duration;

    fn history(symbol: &str, closes: &[f64]) -> PriceHistory {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + ChronoDuration::days(i as i64), c))
            .collect();
        PriceHistory::from_points(symbol, points)
    }

    fn test_config() -> SelectionConfig {
        SelectionConfig {
            lookback_days: 2,
            exclude_recent_days: 0,
            top_percentile: 0.4,
            portfolio_size: 2,
            tilt_exponent: 5.0,
            ..SelectionConfig::default()
        }
    }

    fn worked_example_universe() -> MockUniverse {
        MockUniverse::new()
            .with_history(history("A", &[100.0, 150.0]))
            .with_history(history("B", &[100.0, 130.0]))
            .with_history(history("C", &[100.0, 110.0]))
            .with_history(history("D", &[100.0, 95.0]))
            .with_history(history("E", &[100.0, 144.0]))
    }

    fn pipeline(
        config: SelectionConfig,
        universe: MockUniverse,
        features: MockFeatureFetcher,
        oracle: MockOracle,
    ) -> SelectionPipeline {
        SelectionPipeline::new(
            config,
            Arc::new(universe),
            Arc::new(features),
            Arc::new(oracle),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_worked_example_end_to_end() {
        let oracle = MockOracle::new().with_score("A", 0.75).with_score("E", 1.00);
        let p = pipeline(
            test_config(),
            worked_example_universe(),
            MockFeatureFetcher::new(),
            oracle,
        );

        let output = p.run().await.unwrap();
        let entries = output.portfolio.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].symbol, "E");
        assert_eq!(entries[1].symbol, "A");
        assert_relative_eq!(entries[0].weight, 0.8082, epsilon = 5e-4);
        assert_relative_eq!(entries[1].weight, 0.1918, epsilon = 5e-4);
        assert_relative_eq!(entries[1].momentum_return, 0.50, epsilon = 1e-12);

        assert_eq!(output.summary.initial_universe, 5);
        assert_eq!(output.summary.eligible, 5);
        assert_eq!(output.summary.retained, 2);
        assert_eq!(output.summary.scored, 2);
        assert_eq!(output.summary.final_selected, 2);
        assert!(output.summary.exclusions.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_any_work() {
        let config = test_config().with_top_percentile(0.0);
        let result = SelectionPipeline::new(
            config,
            Arc::new(worked_example_universe()),
            Arc::new(MockFeatureFetcher::new()),
            Arc::new(MockOracle::new()),
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[tokio::test]
    async fn test_universe_failure_is_fatal() {
        let p = pipeline(
            test_config(),
            MockUniverse::new().with_failure("vendor outage"),
            MockFeatureFetcher::new(),
            MockOracle::new(),
        );
        assert!(matches!(p.run().await, Err(PipelineError::Universe(_))));
    }

    #[tokio::test]
    async fn test_scoring_failure_drops_symbol_but_run_continues() {
        let mut config = test_config();
        config.top_percentile = 1.0;
        config.portfolio_size = 5;
        let oracle = MockOracle::new()
            .with_score("A", 0.9)
            .with_score("B", 0.8)
            .with_score("C", 0.7)
            .with_score("D", 0.6)
            .with_failure("E", "rate limited");

        let output = pipeline(
            config,
            worked_example_universe(),
            MockFeatureFetcher::new(),
            oracle,
        )
        .run()
        .await
        .unwrap();

        assert_eq!(output.summary.scored, 4);
        assert_eq!(output.summary.final_selected, 4);
        assert_eq!(output.summary.scoring_failures(), 1);
        assert!(output
            .portfolio
            .entries()
            .iter()
            .all(|e| e.symbol != "E"));
    }

    #[tokio::test]
    async fn test_feature_fetch_failure_drops_symbol() {
        let mut config = test_config();
        config.top_percentile = 1.0;
        config.portfolio_size = 5;
        let features = MockFeatureFetcher::new().with_failure("B", "provider down");
        let oracle = MockOracle::new()
            .with_score("A", 0.9)
            .with_score("C", 0.7)
            .with_score("D", 0.6)
            .with_score("E", 0.5);

        let output = pipeline(config, worked_example_universe(), features, oracle)
            .run()
            .await
            .unwrap();

        assert_eq!(output.summary.scored, 4);
        let counts = output.summary.exclusion_counts();
        assert_eq!(counts["feature_fetch_failed"], 1);
    }

    #[tokio::test]
    async fn test_failure_rate_abort() {
        let mut config = test_config();
        config.top_percentile = 1.0;
        config.portfolio_size = 5;
        // 3 of 5 fail: 0.6 > 0.5 default limit.
        let oracle = MockOracle::new()
            .with_score("A", 0.9)
            .with_score("B", 0.8)
            .with_failure("C", "boom")
            .with_failure("D", "boom")
            .with_failure("E", "boom");

        let result = pipeline(
            config,
            worked_example_universe(),
            MockFeatureFetcher::new(),
            oracle,
        )
        .run()
        .await;

        match result {
            Err(PipelineError::FailureRateExceeded { failed, retained, .. }) => {
                assert_eq!(failed, 3);
                assert_eq!(retained, 5);
            }
            other => panic!("expected failure-rate abort, got {:?}", other.map(|o| o.summary)),
        }
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_clamped_and_counted() {
        let oracle = MockOracle::new().with_score("A", 1.5).with_score("E", -0.2);
        let output = pipeline(
            test_config(),
            worked_example_universe(),
            MockFeatureFetcher::new(),
            oracle,
        )
        .run()
        .await
        .unwrap();

        assert_eq!(output.summary.clamped_scores, 2);
        // A clamps to 1.0, E to 0.0; with p=5 the whole weight lands on A.
        let entries = output.portfolio.entries();
        assert_eq!(entries[0].symbol, "A");
        assert_relative_eq!(entries[0].weight, 1.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_all_zero_scores_fall_back_to_equal_weight() {
        let oracle = MockOracle::new().with_score("A", 0.0).with_score("E", 0.0);
        let output = pipeline(
            test_config(),
            worked_example_universe(),
            MockFeatureFetcher::new(),
            oracle,
        )
        .run()
        .await
        .unwrap();

        assert!(output.summary.degenerate_weights);
        for entry in output.portfolio.entries() {
            assert_relative_eq!(entry.weight, 0.5, epsilon = 1e-12);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_oracle_timeout_counts_as_scoring_failure() {
        let mut config = test_config();
        config.top_percentile = 1.0;
        config.portfolio_size = 5;
        config.scoring.timeout_secs = 1;
        let oracle = MockOracle::new()
            .with_delay(Duration::from_secs(5))
            .with_score("A", 0.9)
            .with_score("B", 0.8)
            .with_score("C", 0.7)
            .with_score("D", 0.6)
            .with_score("E", 0.5);

        let result = pipeline(
            config,
            worked_example_universe(),
            MockFeatureFetcher::new(),
            oracle,
        )
        .run()
        .await;

        // Every call times out, so the failure-rate guard fires.
        assert!(matches!(
            result,
            Err(PipelineError::FailureRateExceeded { failed: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_symbols_scored_once() {
        let universe = MockUniverse::new()
            .with_history(history("A", &[100.0, 150.0]))
            .with_history(history("A", &[100.0, 120.0]))
            .with_history(history("E", &[100.0, 144.0]));
        let mut config = test_config();
        config.top_percentile = 1.0;
        let oracle = MockOracle::new().with_score("A", 0.75).with_score("E", 1.0);

        let p = SelectionPipeline::new(
            config,
            Arc::new(universe),
            Arc::new(MockFeatureFetcher::new()),
            Arc::new(oracle),
        )
        .unwrap();
        let output = p.run().await.unwrap();

        assert_eq!(output.summary.eligible, 2);
        // First history wins: A keeps its +50% return.
        let a = output
            .portfolio
            .entries()
            .iter()
            .find(|e| e.symbol == "A")
            .unwrap();
        assert_relative_eq!(a.momentum_return, 0.50, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_permutation_invariance() {
        let oracle = || {
            MockOracle::new()
                .with_score("A", 0.75)
                .with_score("E", 1.00)
        };
        let forward = pipeline(
            test_config(),
            worked_example_universe(),
            MockFeatureFetcher::new(),
            oracle(),
        );
        let reversed_universe = MockUniverse::new()
            .with_history(history("E", &[100.0, 144.0]))
            .with_history(history("D", &[100.0, 95.0]))
            .with_history(history("C", &[100.0, 110.0]))
            .with_history(history("B", &[100.0, 130.0]))
            .with_history(history("A", &[100.0, 150.0]));
        let backward = pipeline(
            test_config(),
            reversed_universe,
            MockFeatureFetcher::new(),
            oracle(),
        );

        let out_forward = forward.run().await.unwrap();
        let out_backward = backward.run().await.unwrap();
        assert_eq!(
            out_forward.portfolio.entries(),
            out_backward.portfolio.entries()
        );
    }

    #[tokio::test]
    async fn test_empty_universe_yields_empty_portfolio() {
        let p = pipeline(
            test_config(),
            MockUniverse::new(),
            MockFeatureFetcher::new(),
            MockOracle::new(),
        );
        let output = p.run().await.unwrap();
        assert!(output.portfolio.is_empty());
        assert_eq!(output.summary.initial_universe, 0);
        assert_eq!(output.summary.final_selected, 0);
    }
}
