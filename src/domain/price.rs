//! Price Series Types
//!
//! Adjusted-close price observations per symbol, ordered ascending by
//! timestamp. These are the only market data the engine consumes; momentum
//! is derived from them and nothing else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single adjusted-close observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub adjusted_close: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, adjusted_close: f64) -> Self {
        Self {
            timestamp,
            adjusted_close,
        }
    }
}

/// Price history for one symbol.
///
/// Invariant: `points` is ascending by timestamp. `push` keeps the invariant
/// by rejecting out-of-order observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Build a history from pre-collected points, sorting them by timestamp.
    pub fn from_points(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// Append an observation. Returns false (and drops the point) if it is
    /// not strictly newer than the last one.
    pub fn push(&mut self, point: PricePoint) -> bool {
        if let Some(last) = self.points.last() {
            if point.timestamp <= last.timestamp {
                return false;
            }
        }
        self.points.push(point);
        true
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Adjusted closes only, in timestamp order.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.adjusted_close)
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_push_keeps_order() {
        let mut history = PriceHistory::new("AAPL");
        assert!(history.push(PricePoint::new(ts(1), 100.0)));
        assert!(history.push(PricePoint::new(ts(2), 101.0)));
        assert!(!history.push(PricePoint::new(ts(2), 99.0)));
        assert!(!history.push(PricePoint::new(ts(1), 98.0)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_from_points_sorts() {
        let history = PriceHistory::from_points(
            "MSFT",
            vec![
                PricePoint::new(ts(3), 103.0),
                PricePoint::new(ts(1), 101.0),
                PricePoint::new(ts(2), 102.0),
            ],
        );
        let closes: Vec<f64> = history.closes().collect();
        assert_eq!(closes, vec![101.0, 102.0, 103.0]);
    }
}
