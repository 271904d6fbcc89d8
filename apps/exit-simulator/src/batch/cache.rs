//! TTL cache for batch reports.
//!
//! Reports are immutable once built, so readers share them through `Arc`.
//! Two callers racing on the same key both compute and the later insert wins.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::batch::result::BatchReport;
use crate::domain::shared::{StrategyId, Timestamp};

/// Cache key: date range and strategy set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    from: Timestamp,
    to: Timestamp,
    strategies: Vec<StrategyId>,
}

impl CacheKey {
    /// Build a key. Strategy order and duplicates do not matter.
    #[must_use]
    pub fn new(from: Timestamp, to: Timestamp, mut strategies: Vec<StrategyId>) -> Self {
        strategies.sort();
        strategies.dedup();
        Self {
            from,
            to,
            strategies,
        }
    }
}

#[derive(Debug)]
struct CachedReport {
    report: Arc<BatchReport>,
    stored_at: Instant,
}

/// Batch report cache.
#[derive(Debug)]
pub struct ReportCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CachedReport>>,
}

impl ReportCache {
    /// Create a cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh report for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<BatchReport>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|cached| cached.stored_at.elapsed() < self.ttl)
            .map(|cached| Arc::clone(&cached.report))
    }

    /// Store a report, dropping every expired entry first.
    pub fn insert(&self, key: CacheKey, report: Arc<BatchReport>) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, cached| cached.stored_at.elapsed() < self.ttl);
        entries.insert(
            key,
            CachedReport {
                report,
                stored_at: Instant::now(),
            },
        );
    }

    /// Entries currently stored, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
