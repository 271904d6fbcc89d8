//! Batch analysis across many positions and strategies.
//!
//! Every position is one unit of work: all requested strategies are replayed
//! on it and ranked. Units run on a rayon pool; a unit that errors or panics
//! is recorded as skipped and the batch carries on. Cancellation is checked
//! before each unit starts.
//!
//! # Example
//!
//! ```ignore
//! use exit_simulator::batch::{BatchConfig, BatchExecutor};
//! use tokio_util::sync::CancellationToken;
//!
//! let executor = BatchExecutor::new(BatchConfig::default(), SimulationDriver::new())?;
//! let report = executor.run(&jobs, &strategies, &CancellationToken::new())?;
//! println!("{} positions, {} skipped", report.positions_total, report.skipped.len());
//! ```

mod cache;
mod config;
mod error;
mod executor;
mod progress;
mod result;
mod types;

pub use cache::{CacheKey, ReportCache};
pub use config::BatchConfig;
pub use error::BatchError;
pub use executor::BatchExecutor;
pub use progress::{Progress, ProgressTracker};
pub use result::{BatchReport, SkippedPosition, StrategySummary};
pub use types::BatchJob;
