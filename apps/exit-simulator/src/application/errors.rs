//! Application Errors

use thiserror::Error;

use crate::application::ports::PortError;
use crate::batch::BatchError;
use crate::domain::shared::{PositionId, StrategyId, Timestamp};
use crate::domain::simulation::SimulationError;

/// Errors surfaced by the use cases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The position repository does not know the position.
    #[error("Position not found: {position_id}")]
    PositionNotFound {
        /// The missing position ID.
        position_id: PositionId,
    },

    /// The strategy catalog does not know the strategy.
    #[error("Strategy not found: {strategy_id}")]
    StrategyNotFound {
        /// The missing strategy ID.
        strategy_id: StrategyId,
    },

    /// No strategies were requested and none are active.
    #[error("No strategies to compare")]
    NoStrategies,

    /// The date range is inverted.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange {
        /// Range start.
        from: Timestamp,
        /// Range end.
        to: Timestamp,
    },

    /// Inputs failed structural checks.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// A collaborator failed.
    #[error(transparent)]
    Port(#[from] PortError),

    /// The batch failed as a whole.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// The blocking batch task did not complete.
    #[error("Batch task failed: {message}")]
    TaskFailed {
        /// Join error details.
        message: String,
    },
}
