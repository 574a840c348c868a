//! CSV Price Store
//!
//! Universe provider backed by a directory of per-symbol price CSVs, one
//! file per ticker (`AAPL.csv`), columns `date,adjusted_close`. This is
//! the offline-friendly way to feed the engine from a vendor download or
//! a cache refresh job.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{PriceHistory, PricePoint};
use crate::ports::universe::{UniverseError, UniverseProvider};

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: NaiveDate,
    adjusted_close: f64,
}

/// Directory-of-CSVs universe provider
#[derive(Debug, Clone)]
pub struct CsvPriceStore {
    data_dir: PathBuf,
}

impl CsvPriceStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn read_history(&self, path: &std::path::Path, symbol: &str) -> Result<PriceHistory, UniverseError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| UniverseError::MalformedData {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        let mut points = Vec::new();
        for row in reader.deserialize::<PriceRow>() {
            let row = row.map_err(|e| UniverseError::MalformedData {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;
            let timestamp = row
                .date
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always valid")
                .and_utc();
            points.push(PricePoint::new(timestamp, row.adjusted_close));
        }

        Ok(PriceHistory::from_points(symbol, points))
    }
}

#[async_trait]
impl UniverseProvider for CsvPriceStore {
    async fn list_universe(&self) -> Result<Vec<PriceHistory>, UniverseError> {
        if !self.data_dir.is_dir() {
            return Err(UniverseError::Unavailable(format!(
                "price directory not found: {}",
                self.data_dir.display()
            )));
        }

        let mut histories = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let symbol = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_uppercase(),
                None => continue,
            };
            let history = self.read_history(&path, &symbol)?;
            if history.is_empty() {
                tracing::warn!(symbol = %symbol, "skipping empty price file");
                continue;
            }
            histories.push(history);
        }

        // Directory iteration order is platform-dependent; keep the
        // provider deterministic.
        histories.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        tracing::info!(symbols = histories.len(), dir = %self.data_dir.display(), "loaded price universe");
        Ok(histories)
    }
}
