//! Strategy Layer - Momentum Screening, Ranking, and Weight Tilting
//!
//! The deterministic core of the engine:
//! - Momentum percentile filter over trailing returns
//! - Score-based selector with a total tie-break order
//! - Power-law weight allocator with stable normalization
//!
//! Every transform here is pure and single-threaded; identical inputs
//! produce identical outputs regardless of input ordering. Concurrency
//! lives in the application layer, never here.

pub mod allocator;
pub mod momentum;
pub mod params;
pub mod selector;

pub use allocator::{pairwise_sum, Allocation, WeightAllocator, WEIGHT_SUM_EPSILON};
pub use momentum::{MomentumError, MomentumFilter, MomentumScreen};
pub use params::{ConfigError, ScoringLimits, SelectionConfig};
pub use selector::Selector;
