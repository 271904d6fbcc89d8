//! Strategy Catalog Port (Driven Port)
//!
//! Resolves strategy identifiers into validated strategies.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::PortError;
use crate::domain::exit_strategy::ExitStrategy;
use crate::domain::shared::StrategyId;

/// Port for strategy lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StrategyCatalogPort: Send + Sync {
    /// Find a strategy by ID.
    async fn find_by_id(&self, id: &StrategyId) -> Result<Option<ExitStrategy>, PortError>;

    /// List active strategies, sorted by ID.
    async fn list_active(&self) -> Result<Vec<ExitStrategy>, PortError>;
}

/// In-memory implementation.
#[derive(Debug, Default)]
pub struct InMemoryStrategyCatalog {
    strategies: RwLock<BTreeMap<StrategyId, ExitStrategy>>,
}

impl InMemoryStrategyCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a strategy.
    pub fn insert(&self, strategy: ExitStrategy) {
        self.strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(strategy.id().clone(), strategy);
    }
}

#[async_trait]
impl StrategyCatalogPort for InMemoryStrategyCatalog {
    async fn find_by_id(&self, id: &StrategyId) -> Result<Option<ExitStrategy>, PortError> {
        let strategies = self
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(strategies.get(id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<ExitStrategy>, PortError> {
        let strategies = self
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(strategies
            .values()
            .filter(|s| s.is_active())
            .cloned()
            .collect())
    }
}
