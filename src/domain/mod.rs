//! Domain Layer - Core data model for the selection engine
//!
//! Pure types with no knowledge of data providers or the scoring oracle.
//! Everything here is created fresh per pipeline run; the only mutable
//! record is the RunSummary audit trail while a run is in flight.

pub mod candidate;
pub mod portfolio;
pub mod price;
pub mod run_summary;

pub use candidate::{MomentumRecord, ScoredCandidate};
pub use portfolio::{Portfolio, PortfolioEntry, PortfolioSummary};
pub use price::{PriceHistory, PricePoint};
pub use run_summary::{ExclusionReason, RunSummary};
