//! Analyze Batch Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::compare_strategies::resolve_strategies;
use crate::application::errors::AnalysisError;
use crate::application::ports::{PositionRepositoryPort, PriceHistoryPort, StrategyCatalogPort};
use crate::batch::{BatchExecutor, BatchJob, BatchReport, CacheKey, ReportCache, SkippedPosition};
use crate::domain::shared::{StrategyId, Timestamp};
use crate::observability::record_cache_lookup;

/// Batch analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Earliest entry time, inclusive.
    pub from: Timestamp,
    /// Latest entry time, inclusive.
    pub to: Timestamp,
    /// Strategies to compare; every active strategy when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_ids: Option<Vec<StrategyId>>,
}

impl BatchRequest {
    /// Request covering `[from, to]` with every active strategy.
    #[must_use]
    pub const fn new(from: Timestamp, to: Timestamp) -> Self {
        Self {
            from,
            to,
            strategy_ids: None,
        }
    }

    /// Restrict the request to the given strategies.
    #[must_use]
    pub fn with_strategies(mut self, ids: Vec<StrategyId>) -> Self {
        self.strategy_ids = Some(ids);
        self
    }
}

/// Use case for comparing strategies over every position in a date range.
pub struct AnalyzeBatchUseCase<P, S, H>
where
    P: PositionRepositoryPort,
    S: StrategyCatalogPort,
    H: PriceHistoryPort,
{
    positions: Arc<P>,
    strategies: Arc<S>,
    history: Arc<H>,
    executor: Arc<BatchExecutor>,
    cache: Arc<ReportCache>,
}

impl<P, S, H> AnalyzeBatchUseCase<P, S, H>
where
    P: PositionRepositoryPort,
    S: StrategyCatalogPort,
    H: PriceHistoryPort,
{
    /// Create a new `AnalyzeBatchUseCase`.
    pub const fn new(
        positions: Arc<P>,
        strategies: Arc<S>,
        history: Arc<H>,
        executor: Arc<BatchExecutor>,
        cache: Arc<ReportCache>,
    ) -> Self {
        Self {
            positions,
            strategies,
            history,
            executor,
            cache,
        }
    }

    /// Execute the use case.
    ///
    /// Serves a cached report when one is fresh for the same range and
    /// strategy set. Otherwise gathers inputs, runs the CPU-bound batch on a
    /// blocking thread and caches the result.
    pub async fn execute(
        &self,
        request: &BatchRequest,
        cancel: CancellationToken,
    ) -> Result<Arc<BatchReport>, AnalysisError> {
        if request.from > request.to {
            return Err(AnalysisError::InvalidRange {
                from: request.from,
                to: request.to,
            });
        }

        let strategies =
            resolve_strategies(self.strategies.as_ref(), request.strategy_ids.as_deref()).await?;
        let key = CacheKey::new(
            request.from,
            request.to,
            strategies.iter().map(|s| s.id().clone()).collect(),
        );

        if let Some(report) = self.cache.get(&key) {
            record_cache_lookup(true);
            debug!(run_id = %report.run_id, "Serving cached batch report");
            return Ok(report);
        }
        record_cache_lookup(false);

        let positions = self
            .positions
            .list_opened_between(request.from, request.to)
            .await?;

        let mut jobs = Vec::with_capacity(positions.len());
        let mut skipped = Vec::new();
        for position in positions {
            match self.history.price_history(&position.id).await {
                Ok(history) => jobs.push(BatchJob::new(position, history.unwrap_or_default())),
                Err(e) => {
                    warn!(position_id = %position.id, error = %e, "Skipping position without readable history");
                    skipped.push(SkippedPosition {
                        position_id: position.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            from = %request.from,
            to = %request.to,
            positions = jobs.len(),
            skipped = skipped.len(),
            strategies = strategies.len(),
            "Dispatching batch analysis"
        );

        let executor = Arc::clone(&self.executor);
        let report = tokio::task::spawn_blocking(move || {
            executor.run_with_skipped(&jobs, &strategies, &cancel, skipped)
        })
        .await
        .map_err(|e| AnalysisError::TaskFailed {
            message: e.to_string(),
        })??;

        let report = Arc::new(report);
        self.cache.insert(key, Arc::clone(&report));
        Ok(report)
    }
}
