//! Portfolio CSV Export
//!
//! Writes the final portfolio as CSV with a fixed column order
//! (`symbol,weight,momentum_return,ai_score`) and configurable weight
//! precision. Downstream consumers reconstruct the ranking from row
//! order, so rows are written exactly as ranked.

use std::path::Path;

use thiserror::Error;

use crate::domain::Portfolio;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Write the portfolio to `path`, creating parent directories as needed.
///
/// `weight_precision` is the number of decimal digits for the weight
/// column; the output contract requires at least 6.
pub fn export_portfolio<P: AsRef<Path>>(
    portfolio: &Portfolio,
    path: P,
    weight_precision: usize,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["symbol", "weight", "momentum_return", "ai_score"])?;
    for entry in portfolio.entries() {
        writer.write_record([
            entry.symbol.as_str(),
            &format!("{:.prec$}", entry.weight, prec = weight_precision),
            &format!("{:.6}", entry.momentum_return),
            &format!("{:.6}", entry.ai_score),
        ])?;
    }
    writer.flush()?;

    tracing::info!(
        holdings = portfolio.len(),
        path = %path.display(),
        "exported portfolio"
    );
    Ok(())
}
