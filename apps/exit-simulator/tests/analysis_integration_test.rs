//! Integration tests for the analysis use cases over the fixture dataset.
//!
//! Tests the full flow from dataset JSON → in-memory adapters → use cases →
//! batch executor → report.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;

use exit_simulator::application::AnalysisError;
use exit_simulator::application::ports::{
    InMemoryPositionRepository, InMemoryPriceHistory, InMemoryStrategyCatalog,
};
use exit_simulator::application::use_cases::{
    AnalyzeBatchUseCase, BatchRequest, CompareStrategiesUseCase, SimulatePositionUseCase,
};
use exit_simulator::batch::{BatchConfig, BatchExecutor, ReportCache};
use exit_simulator::domain::exit_strategy::RuleKind;
use exit_simulator::domain::shared::{PositionId, StrategyId, Timestamp};
use exit_simulator::domain::simulation::{SimulationDriver, SimulationOutcome};
use exit_simulator::infrastructure::{Dataset, load_dataset};

// =============================================================================
// Test Fixtures Helpers
// =============================================================================

type Adapters = (
    Arc<InMemoryPositionRepository>,
    Arc<InMemoryStrategyCatalog>,
    Arc<InMemoryPriceHistory>,
);

fn fixture_path() -> String {
    format!("{}/tests/fixtures/dataset.json", env!("CARGO_MANIFEST_DIR"))
}

fn load_fixture() -> Dataset {
    load_dataset(fixture_path()).unwrap()
}

fn adapters() -> Adapters {
    load_fixture().into_adapters()
}

fn batch_use_case(
    config: BatchConfig,
) -> AnalyzeBatchUseCase<InMemoryPositionRepository, InMemoryStrategyCatalog, InMemoryPriceHistory>
{
    let (positions, strategies, history) = adapters();
    let executor = Arc::new(BatchExecutor::new(config, SimulationDriver::new()).unwrap());
    let cache = Arc::new(ReportCache::new(Duration::from_secs(60)));
    AnalyzeBatchUseCase::new(positions, strategies, history, executor, cache)
}

fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

fn march() -> BatchRequest {
    BatchRequest::new(ts("2026-03-01T00:00:00Z"), ts("2026-03-31T23:59:59Z"))
}

// =============================================================================
// Dataset
// =============================================================================

#[test]
fn fixture_dataset_loads() {
    let dataset = load_fixture();

    assert_eq!(dataset.strategies.len(), 4);
    assert_eq!(dataset.positions.len(), 4);
    assert_eq!(dataset.price_histories.len(), 3);

    let (from, to) = dataset.entry_range().unwrap();
    assert_eq!(from, ts("2026-03-01T00:00:00Z"));
    assert_eq!(to, ts("2026-03-04T00:00:00Z"));
}

// =============================================================================
// Single position
// =============================================================================

#[tokio::test]
async fn simulate_position_replays_the_ladder() {
    let (positions, strategies, history) = adapters();
    let use_case = SimulatePositionUseCase::new(positions, strategies, history, SimulationDriver::new());

    let result = use_case
        .execute(&PositionId::new("p-bonk"), &StrategyId::new("tp-ladder"))
        .await
        .unwrap();

    assert_eq!(result.outcome, SimulationOutcome::Exited);
    assert_eq!(result.final_pnl_pct, dec!(150));
    assert_eq!(result.final_pnl_abs, dec!(150));
    let kinds: Vec<_> = result.events.iter().map(|e| e.rule_type).collect();
    assert_eq!(kinds, vec![RuleKind::TakeProfit, RuleKind::TakeProfit]);
}

#[tokio::test]
async fn simulate_position_without_history() {
    let (positions, strategies, history) = adapters();
    let use_case = SimulatePositionUseCase::new(positions, strategies, history, SimulationDriver::new());

    let result = use_case
        .execute(&PositionId::new("p-popcat"), &StrategyId::new("scalp"))
        .await
        .unwrap();

    assert_eq!(result.outcome, SimulationOutcome::NoHistory);
    assert_eq!(result.remaining_pct, dec!(100));
}

#[tokio::test]
async fn simulate_unknown_position_fails() {
    let (positions, strategies, history) = adapters();
    let use_case = SimulatePositionUseCase::new(positions, strategies, history, SimulationDriver::new());

    let err = use_case
        .execute(&PositionId::new("p-missing"), &StrategyId::new("scalp"))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::PositionNotFound { .. }));
}

#[tokio::test]
async fn compare_ranks_active_strategies() {
    let (positions, strategies, history) = adapters();
    let use_case =
        CompareStrategiesUseCase::new(positions, strategies, history, SimulationDriver::new());

    let comparison = use_case
        .execute(&PositionId::new("p-bonk"), None)
        .await
        .unwrap();

    let order: Vec<_> = comparison
        .rankings
        .iter()
        .map(|r| (r.result.strategy_id.as_str(), r.result.final_pnl_pct))
        .collect();
    assert_eq!(
        order,
        vec![("tp-ladder", dec!(150)), ("trailing-20", dec!(90)), ("scalp", dec!(20))]
    );

    let best = comparison.best().unwrap();
    assert_eq!(best.delta_vs_actual_pct, Some(dec!(115)));
    assert!(comparison.best_beats_actual());
}

#[tokio::test]
async fn compare_can_target_inactive_strategies_by_id() {
    let (positions, strategies, history) = adapters();
    let use_case =
        CompareStrategiesUseCase::new(positions, strategies, history, SimulationDriver::new());
    let ids = [StrategyId::new("retired")];

    let comparison = use_case
        .execute(&PositionId::new("p-wif"), Some(&ids[..]))
        .await
        .unwrap();

    assert_eq!(comparison.rankings.len(), 1);
    assert_eq!(comparison.rankings[0].result.outcome, SimulationOutcome::Exhausted);
    assert_eq!(comparison.rankings[0].result.final_pnl_pct, dec!(-35));
}

// =============================================================================
// Batch
// =============================================================================

#[tokio::test]
async fn batch_report_over_fixture() {
    let use_case = batch_use_case(BatchConfig::default());

    let report = use_case
        .execute(&march(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.positions_total, 4);
    assert_eq!(report.comparisons.len(), 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].position_id, PositionId::new("p-broken"));
    assert_eq!(
        report.strategy_ids,
        vec![
            StrategyId::new("scalp"),
            StrategyId::new("tp-ladder"),
            StrategyId::new("trailing-20"),
        ]
    );

    let ladder = report.summary(&StrategyId::new("tp-ladder")).unwrap();
    assert_eq!(ladder.positions_simulated, 3);
    assert_eq!(ladder.mean_pnl_pct, dec!(40));
    assert_eq!(ladder.total_pnl_abs, dec!(135));
    assert_eq!(ladder.mean_delta_vs_actual_pct, Some(dec!(55)));
    assert_eq!(ladder.times_ranked_best, 1);

    let scalp = report.summary(&StrategyId::new("scalp")).unwrap();
    assert_eq!(scalp.times_ranked_best, 2);

    assert_eq!(
        report.best_strategy().unwrap().strategy_id,
        StrategyId::new("tp-ladder")
    );
}

#[tokio::test]
async fn batch_report_is_cached() {
    let use_case = batch_use_case(BatchConfig::default());

    let first = use_case
        .execute(&march(), CancellationToken::new())
        .await
        .unwrap();
    let second = use_case
        .execute(&march(), CancellationToken::new())
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn batch_on_dedicated_pool_matches_sequential() {
    let parallel = batch_use_case(BatchConfig {
        max_threads: 2,
        min_parallel_jobs: 1,
        ..BatchConfig::default()
    });
    let sequential = batch_use_case(BatchConfig {
        min_parallel_jobs: 100,
        ..BatchConfig::default()
    });

    let a = parallel.execute(&march(), CancellationToken::new()).await.unwrap();
    let b = sequential.execute(&march(), CancellationToken::new()).await.unwrap();

    assert_eq!(a.comparisons, b.comparisons);
    assert_eq!(a.summaries, b.summaries);
}

#[tokio::test]
async fn cancelled_batch_is_an_error() {
    let use_case = batch_use_case(BatchConfig::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = use_case.execute(&march(), cancel).await.unwrap_err();

    assert!(matches!(err, AnalysisError::Batch(_)));
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let use_case = batch_use_case(BatchConfig::default());
    let request = BatchRequest::new(ts("2026-04-01T00:00:00Z"), ts("2026-03-01T00:00:00Z"));

    let err = use_case
        .execute(&request, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::InvalidRange { .. }));
}
