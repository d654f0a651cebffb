use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vitalog_data::{MeasurementStore, StoreConfig};

/// One-shot setup for the measurement store
///
/// This binary:
/// 1. Initializes environment variables from .env file
/// 2. Sets up tracing for structured logging
/// 3. Opens the configured SQLite database, creating it if needed
/// 4. Runs the schema migrations
/// 5. Reports what the store currently holds
fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    // Initialize tracing for structured logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(true))
        .with(env_filter)
        .init();

    info!("🚀 Setting up the vitalog measurement store");

    let config = StoreConfig::from_env();
    let store = MeasurementStore::open_with_config(&config)
        .with_context(|| format!("failed to open the store at {}", config.path.display()))?;

    store
        .initialize()
        .context("failed to run the schema migrations")?;

    let stats = store.statistics().context("failed to read store statistics")?;
    info!(
        "Store ready: total={}, avg_systolic={}, avg_diastolic={}, avg_pulse={}, avg_glucose={}",
        stats.total, stats.avg_systolic, stats.avg_diastolic, stats.avg_pulse, stats.avg_glucose
    );

    Ok(())
}
