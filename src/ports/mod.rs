//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Universe retrieval (symbols with price histories)
//! - Feature fetching (fundamentals and news per symbol)
//! - The scoring oracle (feature bundle -> score in [0, 1])

pub mod features;
pub mod mocks;
pub mod oracle;
pub mod universe;

pub use features::{FeatureBundle, FeatureError, FeatureFetcher};
pub use oracle::{OracleError, ScoringOracle};
pub use universe::{UniverseError, UniverseProvider};
