//! Error types for batch analysis.

use thiserror::Error;

/// Errors from batch analysis.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// Thread pool initialization failed.
    #[error("Failed to initialize thread pool: {message}")]
    ThreadPoolError {
        /// Error message.
        message: String,
    },

    /// No strategies to compare.
    #[error("No strategies provided for batch analysis")]
    NoStrategies,

    /// The batch was cancelled before every position was processed.
    #[error("Batch cancelled after {completed}/{total} positions")]
    Cancelled {
        /// Positions processed before cancellation.
        completed: u64,
        /// Positions in the batch.
        total: u64,
    },
}
