//! Price History Port (Driven Port)
//!
//! Supplies the price history of a position's token from entry onwards.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::PortError;
use crate::domain::shared::PositionId;
use crate::domain::simulation::PricePoint;

/// Port for price history retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceHistoryPort: Send + Sync {
    /// Price points for a position, sorted by timestamp.
    ///
    /// `Ok(None)` means no history was collected for the position.
    async fn price_history(
        &self,
        position_id: &PositionId,
    ) -> Result<Option<Vec<PricePoint>>, PortError>;
}

/// In-memory implementation.
#[derive(Debug, Default)]
pub struct InMemoryPriceHistory {
    histories: RwLock<HashMap<PositionId, Vec<PricePoint>>>,
}

impl InMemoryPriceHistory {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the history of a position, replacing any previous one.
    pub fn insert(&self, position_id: PositionId, history: Vec<PricePoint>) {
        self.histories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(position_id, history);
    }
}

#[async_trait]
impl PriceHistoryPort for InMemoryPriceHistory {
    async fn price_history(
        &self,
        position_id: &PositionId,
    ) -> Result<Option<Vec<PricePoint>>, PortError> {
        let histories = self
            .histories
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(histories.get(position_id).cloned())
    }
}
