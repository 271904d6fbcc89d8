//! Exit Simulator Binary
//!
//! Replays every active exit strategy over every position in a dataset and
//! prints the batch report as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin exit-simulator
//! ```
//!
//! # Environment Variables
//!
//! - `EXIT_SIM_CONFIG`: Config file path (default: config.yaml)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use exit_simulator::batch::{BatchExecutor, ReportCache};
use exit_simulator::config::{Config, load_config};
use exit_simulator::domain::simulation::SimulationDriver;
use exit_simulator::infrastructure::load_dataset;
use exit_simulator::observability::init_tracing;
use exit_simulator::{AnalyzeBatchUseCase, BatchReport, BatchRequest};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = load_config(None).context("loading configuration")?;
    init_tracing(&config.observability.logging).context("initializing tracing")?;

    tracing::info!(
        same_tick_policy = ?config.simulation.same_tick_policy,
        dataset = %config.dataset.path,
        "Starting exit simulator"
    );

    let report = run(&config).await?;

    let json = serde_json::to_string_pretty(report.as_ref()).context("serializing report")?;
    println!("{json}");

    Ok(())
}

async fn run(config: &Config) -> anyhow::Result<Arc<BatchReport>> {
    let dataset = load_dataset(&config.dataset.path)?;
    let Some((from, to)) = dataset.entry_range() else {
        anyhow::bail!("dataset '{}' contains no positions", config.dataset.path);
    };

    let (positions, strategies, history) = dataset.into_adapters();
    let driver = SimulationDriver::with_config(config.simulation);
    let executor = Arc::new(BatchExecutor::new(config.batch.clone(), driver)?);
    let cache = Arc::new(ReportCache::new(Duration::from_secs(config.batch.cache_ttl_secs)));
    let use_case = AnalyzeBatchUseCase::new(positions, strategies, history, executor, cache);

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let report = use_case
        .execute(&BatchRequest::new(from, to), cancel)
        .await?;

    tracing::info!(
        run_id = %report.run_id,
        positions = report.positions_total,
        skipped = report.skipped.len(),
        elapsed_ms = report.total_time_ms,
        "Batch report ready"
    );

    Ok(report)
}

/// Load `.env` from the working directory or its nearest ancestor.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Cancel the batch on Ctrl-C. Positions already running finish first.
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("Interrupt received, cancelling batch");
            cancel.cancel();
        }
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
    }
}
