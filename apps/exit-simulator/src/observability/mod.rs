//! Observability module for logging and metrics.
//!
//! The library records metrics through the `metrics` facade only; installing
//! an exporter is left to the embedding process.

mod metrics;
mod tracing;

pub use self::metrics::{record_batch, record_cache_lookup, record_simulation};
pub use self::tracing::{TracingError, init_tracing};
