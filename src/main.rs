//! Alphafolio - Momentum + Oracle-Score Portfolio Engine
//!
//! Screens an equity universe by trailing momentum, scores the survivors
//! through a scoring oracle, and allocates power-law tilted weights.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use alphafolio::adapters::cli::{CliApp, Command, GenerateCmd, UniverseCmd, ValidateCmd};
use alphafolio::adapters::{
    export_portfolio, CsvPriceStore, HeuristicOracle, HttpFeatureConfig, HttpFeatureFetcher,
    HttpOracleConfig, HttpScoringOracle, SimFeatureFetcher, SimulatedUniverse,
};
use alphafolio::application::SelectionPipeline;
use alphafolio::config::{load_config, Config};
use alphafolio::ports::{FeatureFetcher, ScoringOracle, UniverseProvider};
use alphafolio::strategy::{MomentumFilter, SelectionConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (API keys go here, not in config.toml)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug)?;

    match app.command {
        Command::Generate(cmd) => generate_command(cmd).await,
        Command::Universe(cmd) => universe_command(cmd).await,
        Command::Validate(cmd) => validate_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    fmt().with_env_filter(filter).init();
    Ok(())
}

/// Providers for one run: real (CSV + HTTP) or paper (seeded simulators).
struct Providers {
    universe: Arc<dyn UniverseProvider>,
    features: Arc<dyn FeatureFetcher>,
    oracle: Arc<dyn ScoringOracle>,
}

fn build_providers(config: &Config, paper: bool, seed: u64) -> Result<Providers> {
    if paper {
        tracing::warn!("PAPER MODE - seeded simulators, no external calls");
        return Ok(Providers {
            universe: Arc::new(SimulatedUniverse::demo(seed)),
            features: Arc::new(SimFeatureFetcher::new(seed)),
            oracle: Arc::new(HeuristicOracle::new()),
        });
    }

    let data_dir = shellexpand::tilde(&config.universe.data_dir).to_string();
    let features = HttpFeatureFetcher::new(HttpFeatureConfig {
        endpoint: config.features.endpoint.clone(),
        api_key: config.features.get_api_key(),
        timeout: Duration::from_secs(config.features.timeout_secs),
    })
    .context("Failed to create feature client")?;
    let oracle = HttpScoringOracle::new(HttpOracleConfig {
        endpoint: config.oracle.endpoint.clone(),
        api_key: config.oracle.get_api_key(),
        timeout: Duration::from_secs(config.oracle.timeout_secs),
    })
    .context("Failed to create oracle client")?;

    Ok(Providers {
        universe: Arc::new(CsvPriceStore::new(data_dir)),
        features: Arc::new(features),
        oracle: Arc::new(oracle),
    })
}

fn apply_overrides(mut selection: SelectionConfig, cmd: &GenerateCmd) -> SelectionConfig {
    if let Some(size) = cmd.portfolio_size {
        selection.portfolio_size = size;
    }
    if let Some(exponent) = cmd.tilt_exponent {
        selection.tilt_exponent = exponent;
    }
    if let Some(percentile) = cmd.top_percentile {
        selection.top_percentile = percentile;
    }
    selection
}

async fn generate_command(cmd: GenerateCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let selection = apply_overrides(config.selection_config(), &cmd);
    let providers = build_providers(&config, cmd.paper, cmd.seed)?;

    let pipeline = SelectionPipeline::new(
        selection,
        providers.universe,
        providers.features,
        providers.oracle,
    )
    .context("Failed to create pipeline")?;

    // Ctrl-C abandons the run before anything is written; a cancelled run
    // leaves no partial portfolio behind.
    let output = tokio::select! {
        result = pipeline.run() => result.context("Selection run failed")?,
        _ = tokio::signal::ctrl_c() => {
            bail!("Run cancelled, no portfolio written");
        }
    };

    println!("{}", output.summary);
    println!("{}", output.portfolio);

    let path = cmd
        .output
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| shellexpand::tilde(&config.output.path).to_string());
    export_portfolio(&output.portfolio, &path, config.output.weight_precision)
        .with_context(|| format!("Failed to export portfolio to {}", path))?;
    println!("Portfolio written to {}", path);

    Ok(())
}

async fn universe_command(cmd: UniverseCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let providers = build_providers(&config, cmd.paper, cmd.seed)?;

    let histories = providers
        .universe
        .list_universe()
        .await
        .context("Failed to load universe")?;
    let screen = MomentumFilter::new(&config.selection_config()).screen(&histories);

    println!(
        "{:<6} {:<8} {:>10}  {}",
        "Rank", "Symbol", "Momentum", "Screen"
    );
    let limit = cmd.limit.unwrap_or(screen.ranking.len());
    for record in screen.ranking.iter().take(limit) {
        let marker = if record.rank <= screen.retained {
            "retained"
        } else {
            ""
        };
        println!(
            "{:<6} {:<8} {:>9.2}%  {}",
            record.rank,
            record.symbol,
            record.trailing_return * 100.0,
            marker
        );
    }
    if !screen.exclusions.is_empty() {
        println!("\n{} symbols excluded:", screen.exclusions.len());
        for (symbol, reason) in &screen.exclusions {
            println!("  {:<8} {}", symbol, reason);
        }
    }

    Ok(())
}

async fn validate_command(cmd: ValidateCmd) -> Result<()> {
    let config = load_config(&cmd.config)
        .with_context(|| format!("Invalid configuration: {}", cmd.config.display()))?;
    let selection = config.selection_config();

    println!("Configuration OK: {}", cmd.config.display());
    println!("  lookback:        {} days", selection.lookback_days);
    println!("  exclude recent:  {} days", selection.exclude_recent_days);
    println!("  top percentile:  {}", selection.top_percentile);
    println!("  portfolio size:  {}", selection.portfolio_size);
    println!("  tilt exponent:   {}", selection.tilt_exponent);
    println!(
        "  oracle:          {} (concurrency {}, timeout {}s)",
        config.oracle.endpoint, config.oracle.concurrency_limit, config.oracle.timeout_secs
    );

    Ok(())
}
