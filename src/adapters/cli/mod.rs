//! CLI Adapter
//!
//! Command-line interface for the alphafolio binary.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, GenerateCmd, UniverseCmd, ValidateCmd};
