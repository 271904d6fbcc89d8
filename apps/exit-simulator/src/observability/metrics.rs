//! Metrics for simulations and batch runs.
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, histogram};

/// Record a finished simulation.
///
/// # Arguments
///
/// * `outcome` - Simulation outcome (`"exited"`, `"exhausted"`, `"no_history"`)
pub fn record_simulation(outcome: &'static str) {
    counter!("exit_simulations_total", "outcome" => outcome).increment(1);
}

/// Record a finished batch.
///
/// # Arguments
///
/// * `duration_seconds` - Wall-clock duration of the batch
/// * `skipped` - Positions that could not be simulated
pub fn record_batch(duration_seconds: f64, skipped: u64) {
    histogram!("exit_batch_duration_seconds").record(duration_seconds);
    counter!("exit_batch_positions_skipped_total").increment(skipped);
}

/// Record a batch report cache lookup.
///
/// # Arguments
///
/// * `hit` - Whether a fresh report was found
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("exit_batch_cache_lookups_total", "result" => result).increment(1);
}
