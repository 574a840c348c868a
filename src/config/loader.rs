//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config.toml structure.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::strategy::{ScoringLimits, SelectionConfig};

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub universe: UniverseSection,
    pub strategy: StrategySection,
    pub features: FeaturesSection,
    pub oracle: OracleSection,
    pub output: OutputSection,
    pub logging: LoggingSection,
}

/// Universe data configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct UniverseSection {
    /// Directory of per-symbol price CSVs (one file per ticker)
    pub data_dir: String,
}

/// Strategy configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct StrategySection {
    /// Momentum lookback window in trading days (252 ~ 12 months)
    pub lookback_days: usize,
    /// Bars dropped from the end of the window (21 ~ 1 month, 0 disables)
    pub exclude_recent_days: usize,
    /// Fraction of the eligible universe kept by the momentum screen
    pub top_percentile: f64,
    /// Final number of holdings
    pub portfolio_size: usize,
    /// Score tilt exponent; 0 = equal weight
    pub tilt_exponent: f64,
}

/// Feature service configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturesSection {
    /// Base URL of the fundamentals/news feature service
    pub endpoint: String,
    /// Optional API key (prefer the FEATURES_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_features_timeout")]
    pub timeout_secs: u64,
}

fn default_features_timeout() -> u64 {
    15
}

impl FeaturesSection {
    /// Get API key with environment variable fallback
    /// Checks the config value first, then the FEATURES_API_KEY env var
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("FEATURES_API_KEY").ok()
    }
}

/// Scoring oracle configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct OracleSection {
    /// Scoring endpoint URL
    pub endpoint: String,
    /// Optional API key (prefer the ORACLE_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Maximum in-flight oracle calls
    pub concurrency_limit: usize,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Abort the run when more than this fraction of retained symbols
    /// fails scoring
    pub max_failure_rate: f64,
}

/// Output configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Portfolio CSV destination
    pub path: String,
    /// Decimal digits for the weight column (contract minimum: 6)
    #[serde(default = "default_weight_precision")]
    pub weight_precision: usize,
}

fn default_weight_precision() -> usize {
    6
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error(transparent)]
    StrategyError(#[from] crate::strategy::ConfigError),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.data_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "data_dir cannot be empty".to_string(),
            ));
        }

        if self.features.endpoint.is_empty() {
            return Err(ConfigError::ValidationError(
                "features endpoint cannot be empty".to_string(),
            ));
        }

        if self.oracle.endpoint.is_empty() {
            return Err(ConfigError::ValidationError(
                "oracle endpoint cannot be empty".to_string(),
            ));
        }

        if self.output.path.is_empty() {
            return Err(ConfigError::ValidationError(
                "output path cannot be empty".to_string(),
            ));
        }

        if self.output.weight_precision < 6 {
            return Err(ConfigError::ValidationError(format!(
                "weight_precision must be >= 6, got {}",
                self.output.weight_precision
            )));
        }

        // Knob-level checks live with the strategy params so InvalidConfig
        // has a single home.
        self.selection_config().validate()?;
        Ok(())
    }

    /// Assemble the engine-facing selection config from the strategy and
    /// oracle sections.
    pub fn selection_config(&self) -> SelectionConfig {
        SelectionConfig {
            lookback_days: self.strategy.lookback_days,
            exclude_recent_days: self.strategy.exclude_recent_days,
            top_percentile: self.strategy.top_percentile,
            portfolio_size: self.strategy.portfolio_size,
            tilt_exponent: self.strategy.tilt_exponent,
            scoring: ScoringLimits {
                concurrency_limit: self.oracle.concurrency_limit,
                timeout_secs: self.oracle.timeout_secs,
                max_failure_rate: self.oracle.max_failure_rate,
            },
        }
    }
}

impl OracleSection {
    /// Get API key with environment variable fallback
    /// Checks the config value first, then the ORACLE_API_KEY env var
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("ORACLE_API_KEY").ok()
    }
}
