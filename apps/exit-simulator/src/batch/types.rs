//! Batch work units.

use serde::{Deserialize, Serialize};

use crate::domain::position::PositionRecord;
use crate::domain::simulation::PricePoint;

/// One position and its price history.
///
/// An empty `history` is valid and produces `no_history` results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    /// Position to replay strategies on.
    pub position: PositionRecord,
    /// Price history of the position's token from entry onwards.
    pub history: Vec<PricePoint>,
}

impl BatchJob {
    /// Create a job.
    #[must_use]
    pub const fn new(position: PositionRecord, history: Vec<PricePoint>) -> Self {
        Self { position, history }
    }
}
