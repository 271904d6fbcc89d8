//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::{LogFormat, LoggingConfig};

/// Error type for tracing operations.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// The rejected filter.
        filter: String,
        /// Parser message.
        message: String,
    },
    /// Failed to initialize tracing subscriber.
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberError(String),
}

/// Build the filter: `RUST_LOG` when set, the configured level otherwise.
///
/// # Errors
///
/// Returns an error if the configured level does not parse.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TracingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| TracingError::InvalidFilter {
        filter: config.level.clone(),
        message: e.to_string(),
    })
}

/// Install the global subscriber.
///
/// JSON output carries the current span and span list when `include_spans`
/// is set; pretty output logs span close events instead.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingError> {
    let filter = build_filter(config)?;

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .with_span_events(if config.include_spans {
                FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            })
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| TracingError::SubscriberError(e.to_string()))
}
