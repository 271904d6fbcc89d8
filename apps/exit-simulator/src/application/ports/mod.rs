//! Application Ports (Driven)
//!
//! Collaborators the simulator reads from. Expected absences are `Ok(None)`;
//! `PortError` is reserved for the collaborator itself failing.

mod position_repository_port;
mod price_history_port;
mod strategy_catalog_port;

use thiserror::Error;

pub use position_repository_port::{InMemoryPositionRepository, PositionRepositoryPort};
pub use price_history_port::{InMemoryPriceHistory, PriceHistoryPort};
pub use strategy_catalog_port::{InMemoryStrategyCatalog, StrategyCatalogPort};

#[cfg(test)]
pub use position_repository_port::MockPositionRepositoryPort;
#[cfg(test)]
pub use price_history_port::MockPriceHistoryPort;
#[cfg(test)]
pub use strategy_catalog_port::MockStrategyCatalogPort;

/// Errors from driven ports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortError {
    /// The backing store could not be reached.
    #[error("Port unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The backing store returned data that could not be decoded.
    #[error("Corrupt record '{key}': {message}")]
    Corrupt {
        /// Key of the offending record.
        key: String,
        /// Error details.
        message: String,
    },
}
