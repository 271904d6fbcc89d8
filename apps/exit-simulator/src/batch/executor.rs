//! Parallel batch executor using Rayon.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::comparison::{Comparator, StrategyComparison};
use crate::domain::exit_strategy::ExitStrategy;
use crate::domain::simulation::{SimulationDriver, SimulationError, SimulationResult};
use crate::observability::record_batch;

use super::config::BatchConfig;
use super::error::BatchError;
use super::progress::ProgressTracker;
use super::result::{BatchReport, SkippedPosition};
use super::types::BatchJob;

enum JobOutcome {
    Compared(StrategyComparison),
    Skipped(SkippedPosition),
    Cancelled,
}

/// Batch executor.
#[derive(Debug)]
pub struct BatchExecutor {
    config: BatchConfig,
    driver: SimulationDriver,
    pool: Option<rayon::ThreadPool>,
}

impl BatchExecutor {
    /// Create an executor.
    ///
    /// A dedicated pool is built when `max_threads > 0`; otherwise work runs
    /// on rayon's global pool.
    ///
    /// # Errors
    ///
    /// Returns error if the thread pool cannot be built.
    pub fn new(config: BatchConfig, driver: SimulationDriver) -> Result<Self, BatchError> {
        let pool = if config.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.max_threads)
                .thread_name(|i| format!("exit-sim-{i}"))
                .build()
                .map_err(|e| BatchError::ThreadPoolError {
                    message: e.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            config,
            driver,
            pool,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Get effective thread count.
    #[must_use]
    pub fn effective_thread_count(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, rayon::ThreadPool::current_num_threads)
    }

    /// Replay every strategy on every job and rank the results.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::NoStrategies`] for an empty strategy set and
    /// [`BatchError::Cancelled`] when `cancel` fires before all positions ran.
    pub fn run(
        &self,
        jobs: &[BatchJob],
        strategies: &[ExitStrategy],
        cancel: &CancellationToken,
    ) -> Result<BatchReport, BatchError> {
        self.run_with_skipped(jobs, strategies, cancel, Vec::new())
    }

    /// Like [`run`](Self::run), for callers that already dropped some
    /// positions while gathering inputs.
    ///
    /// `skipped` is reported ahead of the positions skipped here and counts
    /// towards `positions_total`.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    #[allow(clippy::cast_possible_truncation)]
    pub fn run_with_skipped(
        &self,
        jobs: &[BatchJob],
        strategies: &[ExitStrategy],
        cancel: &CancellationToken,
        skipped: Vec<SkippedPosition>,
    ) -> Result<BatchReport, BatchError> {
        if strategies.is_empty() {
            return Err(BatchError::NoStrategies);
        }

        let tracker = Arc::new(ProgressTracker::new(jobs.len() as u64));
        let start_time = Instant::now();

        info!(
            positions = jobs.len(),
            strategies = strategies.len(),
            threads = self.effective_thread_count(),
            "Starting batch analysis"
        );

        let outcomes: Vec<JobOutcome> = if jobs.len() >= self.config.min_parallel_jobs {
            match &self.pool {
                Some(pool) => pool.install(|| self.run_parallel(jobs, strategies, cancel, &tracker)),
                None => self.run_parallel(jobs, strategies, cancel, &tracker),
            }
        } else {
            self.run_sequential(jobs, strategies, cancel, &tracker)
        };

        let elapsed = start_time.elapsed();
        let final_progress = tracker.progress();

        if cancel.is_cancelled() && final_progress.completed < final_progress.total {
            warn!(
                completed = final_progress.completed,
                total = final_progress.total,
                "Batch analysis cancelled"
            );
            return Err(BatchError::Cancelled {
                completed: final_progress.completed,
                total: final_progress.total,
            });
        }

        let mut comparisons = Vec::with_capacity(outcomes.len());
        let mut skipped = skipped;
        for outcome in outcomes {
            match outcome {
                JobOutcome::Compared(comparison) => comparisons.push(comparison),
                JobOutcome::Skipped(position) => skipped.push(position),
                JobOutcome::Cancelled => {}
            }
        }

        let mut strategy_ids: Vec<_> = strategies.iter().map(|s| s.id().clone()).collect();
        strategy_ids.sort();

        info!(
            simulated = comparisons.len(),
            skipped = skipped.len(),
            elapsed_secs = elapsed.as_secs_f64(),
            "Batch analysis complete"
        );
        record_batch(elapsed.as_secs_f64(), skipped.len() as u64);

        Ok(BatchReport::build(
            strategy_ids,
            comparisons,
            skipped,
            elapsed.as_millis() as u64,
        ))
    }

    fn run_parallel(
        &self,
        jobs: &[BatchJob],
        strategies: &[ExitStrategy],
        cancel: &CancellationToken,
        tracker: &Arc<ProgressTracker>,
    ) -> Vec<JobOutcome> {
        jobs.par_iter()
            .map(|job| self.process(job, strategies, cancel, tracker))
            .collect()
    }

    fn run_sequential(
        &self,
        jobs: &[BatchJob],
        strategies: &[ExitStrategy],
        cancel: &CancellationToken,
        tracker: &Arc<ProgressTracker>,
    ) -> Vec<JobOutcome> {
        jobs.iter()
            .map(|job| self.process(job, strategies, cancel, tracker))
            .collect()
    }

    fn process(
        &self,
        job: &BatchJob,
        strategies: &[ExitStrategy],
        cancel: &CancellationToken,
        tracker: &Arc<ProgressTracker>,
    ) -> JobOutcome {
        if cancel.is_cancelled() {
            return JobOutcome::Cancelled;
        }

        let outcome = match self.execute_job(job, strategies) {
            Ok(results) => JobOutcome::Compared(Comparator::compare(&job.position, results)),
            Err(reason) => {
                warn!(position_id = %job.position.id, %reason, "Skipping position");
                JobOutcome::Skipped(SkippedPosition {
                    position_id: job.position.id.clone(),
                    reason,
                })
            }
        };
        tracker.position_completed();

        if self.config.track_progress {
            let progress = tracker.progress();
            debug!(
                "Progress: {:.1}% ({}/{}) - ETA: {}s",
                progress.percentage(),
                progress.completed,
                progress.total,
                progress.eta_secs
            );
        }

        outcome
    }

    fn execute_job(
        &self,
        job: &BatchJob,
        strategies: &[ExitStrategy],
    ) -> Result<Vec<SimulationResult>, String> {
        let _span = tracing::debug_span!("batch_job", position_id = %job.position.id).entered();

        let run = || -> Result<Vec<SimulationResult>, SimulationError> {
            strategies
                .iter()
                .map(|strategy| {
                    self.driver
                        .simulate(strategy, &job.position.entry, &job.history)
                })
                .collect()
        };

        match panic::catch_unwind(AssertUnwindSafe(run)) {
            Ok(Ok(results)) => Ok(results),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("simulation panicked: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exit_strategy::ExitRule;
    use crate::domain::position::PositionRecord;
    use crate::domain::shared::Timestamp;
    use crate::domain::simulation::{PositionEntry, PricePoint};
    use chrono::Duration;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn start() -> Timestamp {
        Timestamp::parse("2026-01-01T00:00:00Z").unwrap()
    }

    fn job(id: &str, entry_price: Decimal, prices: &[Decimal]) -> BatchJob {
        let position = PositionRecord::new(id, "TOKEN", PositionEntry::new(entry_price, start(), dec!(100)));
        let history = prices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                PricePoint::new(
                    Timestamp::new(start().as_datetime() + Duration::hours(i as i64 + 1)),
                    *p,
                )
            })
            .collect();
        BatchJob::new(position, history)
    }

    fn strategies() -> Vec<ExitStrategy> {
        vec![
            ExitStrategy::builder("tp", "Take profit")
                .rule(ExitRule::take_profit(dec!(50), dec!(100), 1))
                .build()
                .unwrap(),
            ExitStrategy::builder("sl", "Stop loss")
                .rule(ExitRule::stop_loss(dec!(-10), dec!(100), 1))
                .build()
                .unwrap(),
        ]
    }

    fn config(min_parallel_jobs: usize, max_threads: usize) -> BatchConfig {
        BatchConfig {
            max_threads,
            min_parallel_jobs,
            track_progress: false,
            ..BatchConfig::default()
        }
    }

    #[test]
    fn invalid_position_is_skipped_not_fatal() {
        let executor = BatchExecutor::new(config(100, 0), SimulationDriver::new()).unwrap();
        let jobs = vec![
            job("good", dec!(1), &[dec!(1.6)]),
            job("bad", dec!(0), &[dec!(1)]),
        ];

        let report = executor
            .run(&jobs, &strategies(), &CancellationToken::new())
            .unwrap();

        assert_eq!(report.positions_total, 2);
        assert_eq!(report.comparisons.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].position_id.as_str(), "bad");
        assert!(report.skipped[0].reason.contains("entry price"));
    }

    #[test]
    fn skipped_positions_from_caller_are_reported_first() {
        let executor = BatchExecutor::new(config(100, 0), SimulationDriver::new()).unwrap();
        let jobs = vec![job("good", dec!(1), &[dec!(1.6)]), job("bad", dec!(0), &[dec!(1)])];
        let earlier = vec![SkippedPosition {
            position_id: "unfetched".into(),
            reason: "Port unavailable: timeout".to_string(),
        }];

        let report = executor
            .run_with_skipped(&jobs, &strategies(), &CancellationToken::new(), earlier)
            .unwrap();

        assert_eq!(report.positions_total, 3);
        assert_eq!(report.comparisons.len(), 1);
        let ids: Vec<_> = report.skipped.iter().map(|s| s.position_id.as_str()).collect();
        assert_eq!(ids, vec!["unfetched", "bad"]);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let jobs: Vec<BatchJob> = (0..8)
            .map(|i| job(&format!("p{i}"), dec!(1), &[dec!(0.95), dec!(1.2), dec!(1.55), dec!(0.8)]))
            .collect();

        let sequential = BatchExecutor::new(config(100, 0), SimulationDriver::new())
            .unwrap()
            .run(&jobs, &strategies(), &CancellationToken::new())
            .unwrap();
        let parallel = BatchExecutor::new(config(1, 2), SimulationDriver::new())
            .unwrap()
            .run(&jobs, &strategies(), &CancellationToken::new())
            .unwrap();

        assert_eq!(sequential.comparisons, parallel.comparisons);
        assert_eq!(sequential.summaries, parallel.summaries);
        assert_eq!(parallel.summary(&"tp".into()).unwrap().mean_pnl_pct, dec!(55));
    }

    #[test]
    fn cancelled_batch_returns_error() {
        let executor = BatchExecutor::new(config(100, 0), SimulationDriver::new()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = executor
            .run(&[job("p", dec!(1), &[dec!(1)])], &strategies(), &cancel)
            .unwrap_err();
        assert_eq!(err, BatchError::Cancelled { completed: 0, total: 1 });
    }

    #[test]
    fn empty_strategy_set_is_rejected() {
        let executor = BatchExecutor::new(config(1, 0), SimulationDriver::new()).unwrap();
        let err = executor
            .run(&[], &[], &CancellationToken::new())
            .unwrap_err();
        assert_eq!(err, BatchError::NoStrategies);
    }

    #[test]
    fn panic_payloads_are_described() {
        let message = panic_message(&"boom");
        assert_eq!(message, "simulation panicked: boom");
    }
}
