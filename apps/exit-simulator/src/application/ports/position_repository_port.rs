//! Position Repository Port (Driven Port)
//!
//! Supplies historical positions and their actual outcomes.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::PortError;
use crate::domain::position::PositionRecord;
use crate::domain::shared::{PositionId, Timestamp};

/// Port for position retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionRepositoryPort: Send + Sync {
    /// Find a position by ID.
    async fn find_by_id(&self, id: &PositionId) -> Result<Option<PositionRecord>, PortError>;

    /// Positions opened within `[from, to]`, oldest first.
    async fn list_opened_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<PositionRecord>, PortError>;
}

/// In-memory implementation.
#[derive(Debug, Default)]
pub struct InMemoryPositionRepository {
    positions: RwLock<HashMap<PositionId, PositionRecord>>,
}

impl InMemoryPositionRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a position.
    pub fn insert(&self, position: PositionRecord) {
        self.positions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(position.id.clone(), position);
    }
}

#[async_trait]
impl PositionRepositoryPort for InMemoryPositionRepository {
    async fn find_by_id(&self, id: &PositionId) -> Result<Option<PositionRecord>, PortError> {
        let positions = self
            .positions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(positions.get(id).cloned())
    }

    async fn list_opened_between(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<PositionRecord>, PortError> {
        let positions = self
            .positions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut found: Vec<PositionRecord> = positions
            .values()
            .filter(|p| p.opened_within(from, to))
            .cloned()
            .collect();
        drop(positions);
        found.sort_by(|a, b| a.opened_at().cmp(&b.opened_at()).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulation::PositionEntry;
    use rust_decimal_macros::dec;

    fn position(id: &str, opened: &str) -> PositionRecord {
        PositionRecord::new(
            id,
            "TOKEN",
            PositionEntry::new(dec!(1), Timestamp::parse(opened).unwrap(), dec!(100)),
        )
    }

    #[tokio::test]
    async fn in_memory_lists_range_oldest_first() {
        let repo = InMemoryPositionRepository::new();
        repo.insert(position("late", "2026-03-05T00:00:00Z"));
        repo.insert(position("early", "2026-03-01T00:00:00Z"));
        repo.insert(position("outside", "2026-04-01T00:00:00Z"));

        let found = repo
            .list_opened_between(
                Timestamp::parse("2026-03-01T00:00:00Z").unwrap(),
                Timestamp::parse("2026-03-31T00:00:00Z").unwrap(),
            )
            .await
            .unwrap();

        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        assert!(repo.find_by_id(&"outside".into()).await.unwrap().is_some());
    }
}
