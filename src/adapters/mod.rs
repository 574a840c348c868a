//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - CSV price store: universe from a directory of per-symbol price files
//! - Simulators: seeded offline providers for paper mode
//! - HTTP oracle: remote scoring backend client
//! - HTTP features: research-data service client
//! - Export: portfolio CSV writer
//! - CLI: command-line argument definitions

pub mod cli;
pub mod csv_store;
pub mod export;
pub mod features_http;
pub mod oracle_http;
pub mod sim;

pub use cli::CliApp;
pub use csv_store::CsvPriceStore;
pub use export::{export_portfolio, ExportError};
pub use features_http::{HttpFeatureConfig, HttpFeatureFetcher};
pub use oracle_http::{HttpOracleConfig, HttpScoringOracle};
pub use sim::{HeuristicOracle, SimFeatureFetcher, SimulatedUniverse};
