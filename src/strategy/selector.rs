//! Candidate Selector
//!
//! Ranks oracle-scored candidates and truncates to the configured
//! portfolio size. A pure, single-threaded transform: the output order is
//! the externally visible ranking (index 0 = best), so determinism matters
//! more than speed here.

use crate::domain::ScoredCandidate;
use crate::strategy::params::SelectionConfig;

/// Score-based selector
#[derive(Debug, Clone)]
pub struct Selector {
    portfolio_size: usize,
}

impl Selector {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            portfolio_size: config.portfolio_size,
        }
    }

    /// Sort descending by ai_score, ties by trailing return descending,
    /// then symbol ascending, and keep the best `portfolio_size` names.
    ///
    /// Requesting more names than exist is not an error; the whole
    /// candidate set comes back in rank order.
    pub fn select(&self, mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        candidates.sort_by(|a, b| {
            b.ai_score
                .partial_cmp(&a.ai_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.momentum_return
                        .partial_cmp(&a.momentum_return)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        candidates.truncate(self.portfolio_size);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(size: usize) -> Selector {
        Selector::new(&SelectionConfig::default().with_portfolio_size(size))
    }

    fn candidate(symbol: &str, momentum: f64, score: f64) -> ScoredCandidate {
        ScoredCandidate::new(symbol, momentum, score)
    }

    #[test]
    fn test_orders_by_score() {
        let out = selector(3).select(vec![
            candidate("A", 0.1, 0.2),
            candidate("B", 0.1, 0.9),
            candidate("C", 0.1, 0.5),
        ]);
        let order: Vec<&str> = out.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_truncates_to_portfolio_size() {
        let out = selector(2).select(vec![
            candidate("A", 0.1, 0.2),
            candidate("B", 0.1, 0.9),
            candidate("C", 0.1, 0.5),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].symbol, "B");
        assert_eq!(out[1].symbol, "C");
    }

    #[test]
    fn test_fewer_candidates_than_requested() {
        let out = selector(10).select(vec![candidate("A", 0.1, 0.2)]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_score_tie_breaks_by_momentum_then_symbol() {
        let out = selector(4).select(vec![
            candidate("ZZZ", 0.30, 0.8),
            candidate("AAA", 0.30, 0.8),
            candidate("MMM", 0.50, 0.8),
            candidate("BBB", 0.10, 0.9),
        ]);
        let order: Vec<&str> = out.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(order, vec!["BBB", "MMM", "AAA", "ZZZ"]);
    }

    #[test]
    fn test_output_is_prefix_of_full_ranking() {
        let candidates = vec![
            candidate("A", 0.3, 0.91),
            candidate("B", 0.2, 0.42),
            candidate("C", 0.5, 0.77),
            candidate("D", 0.1, 0.05),
            candidate("E", 0.4, 0.64),
        ];
        let full = selector(5).select(candidates.clone());
        let truncated = selector(3).select(candidates);
        assert_eq!(&full[..3], &truncated[..]);
        for window in full.windows(2) {
            assert!(window[0].ai_score >= window[1].ai_score);
        }
    }

    #[test]
    fn test_permutation_invariance() {
        let mut candidates = vec![
            candidate("A", 0.3, 0.91),
            candidate("B", 0.2, 0.42),
            candidate("C", 0.5, 0.77),
        ];
        let forward = selector(2).select(candidates.clone());
        candidates.reverse();
        let backward = selector(2).select(candidates);
        assert_eq!(forward, backward);
    }
}
