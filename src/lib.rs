//! Alphafolio - Momentum + Oracle-Score Portfolio Engine Library
//!
//! Screens an equity universe by trailing momentum, scores the survivors
//! through a pluggable scoring oracle, and allocates weights with a
//! power-law tilt on the scores.
//!
//! # Modules
//!
//! - `domain`: Core data model (prices, candidates, portfolio, run audit)
//! - `ports`: Trait abstractions (UniverseProvider, FeatureFetcher, ScoringOracle)
//! - `strategy`: The deterministic core (momentum filter, selector, allocator)
//! - `application`: The selection pipeline orchestrator
//! - `adapters`: External implementations (CSV store, HTTP clients, simulators, CLI)
//! - `config`: Configuration loading and validation

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod strategy;
