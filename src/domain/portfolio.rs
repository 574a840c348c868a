//! Portfolio Output Types
//!
//! The terminal artifact of a pipeline run: an ordered list of holdings
//! with normalized weights. Order is rank order (index 0 = highest score)
//! and is part of the external contract; downstream reporting reconstructs
//! the ranking from it.

use std::fmt;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// One final holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub symbol: String,
    /// Normalized weight; entries of a portfolio sum to 1.0 within 1e-6,
    /// and every weight is positive whenever every selected score is.
    pub weight: f64,
    pub momentum_return: f64,
    pub ai_score: f64,
}

impl PortfolioEntry {
    pub fn new(
        symbol: impl Into<String>,
        weight: f64,
        momentum_return: f64,
        ai_score: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
            momentum_return,
            ai_score,
        }
    }
}

/// Ordered set of holdings plus derived summary statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    entries: Vec<PortfolioEntry>,
}

/// Snapshot of portfolio-level statistics for reports.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub holdings: usize,
    pub min_weight: f64,
    pub avg_weight: f64,
    pub max_weight: f64,
    /// Herfindahl index, sum of squared weights. 1/n for equal weight,
    /// approaches 1.0 as the portfolio concentrates.
    pub concentration: f64,
    pub weighted_avg_momentum: f64,
    pub avg_ai_score: f64,
}

impl Portfolio {
    /// Wrap ranked entries. Callers are responsible for rank order; the
    /// allocator produces it.
    pub fn new(entries: Vec<PortfolioEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PortfolioEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn weight_sum(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    pub fn summary(&self) -> Option<PortfolioSummary> {
        if self.entries.is_empty() {
            return None;
        }
        let weights: Vec<f64> = self.entries.iter().map(|e| e.weight).collect();
        let scores: Vec<f64> = self.entries.iter().map(|e| e.ai_score).collect();
        let concentration = weights.iter().map(|w| w * w).sum();
        let weighted_avg_momentum = self
            .entries
            .iter()
            .map(|e| e.momentum_return * e.weight)
            .sum();

        Some(PortfolioSummary {
            holdings: self.entries.len(),
            min_weight: weights.iter().copied().fold(f64::INFINITY, f64::min),
            avg_weight: weights.iter().copied().mean(),
            max_weight: weights.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            concentration,
            weighted_avg_momentum,
            avg_ai_score: scores.iter().copied().mean(),
        })
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<6} {:<8} {:>9} {:>10} {:>9}",
            "Rank", "Symbol", "Weight", "Momentum", "Score"
        )?;
        writeln!(f, "{}", "-".repeat(48))?;
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(
                f,
                "{:<6} {:<8} {:>8.2}% {:>9.2}% {:>9.3}",
                i + 1,
                entry.symbol,
                entry.weight * 100.0,
                entry.momentum_return * 100.0,
                entry.ai_score
            )?;
        }
        if let Some(summary) = self.summary() {
            writeln!(f, "{}", "-".repeat(48))?;
            writeln!(
                f,
                "{} holdings | max {:.2}% | HHI {:.4}",
                summary.holdings,
                summary.max_weight * 100.0,
                summary.concentration
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Portfolio {
        Portfolio::new(vec![
            PortfolioEntry::new("AAA", 0.6, 0.30, 0.9),
            PortfolioEntry::new("BBB", 0.4, 0.10, 0.7),
        ])
    }

    #[test]
    fn test_weight_sum() {
        assert_relative_eq!(sample().weight_sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_summary_statistics() {
        let summary = sample().summary().unwrap();
        assert_eq!(summary.holdings, 2);
        assert_relative_eq!(summary.avg_weight, 0.5, epsilon = 1e-12);
        assert_relative_eq!(summary.max_weight, 0.6, epsilon = 1e-12);
        assert_relative_eq!(summary.concentration, 0.36 + 0.16, epsilon = 1e-12);
        assert_relative_eq!(
            summary.weighted_avg_momentum,
            0.6 * 0.30 + 0.4 * 0.10,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empty_summary() {
        assert!(Portfolio::default().summary().is_none());
    }

    #[test]
    fn test_display_contains_holdings() {
        let text = sample().to_string();
        assert!(text.contains("AAA"));
        assert!(text.contains("2 holdings"));
    }
}
