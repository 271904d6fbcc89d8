//! Result types for batch analysis.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::comparison::StrategyComparison;
use crate::domain::shared::{BatchRunId, PositionId, StrategyId};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const SUMMARY_DP: u32 = 4;

/// A position the batch could not simulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPosition {
    /// Position that was skipped.
    pub position_id: PositionId,
    /// Why it was skipped.
    pub reason: String,
}

/// Aggregate performance of one strategy across the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySummary {
    /// Strategy being summarized.
    pub strategy_id: StrategyId,
    /// Positions the strategy was replayed on.
    pub positions_simulated: u64,
    /// Mean `final_pnl_pct`.
    pub mean_pnl_pct: Decimal,
    /// Sum of `final_pnl_abs`.
    pub total_pnl_abs: Decimal,
    /// Share of positions that ended in profit, in percent.
    pub win_rate_pct: Decimal,
    /// Mean difference to the real trade, over positions with a known outcome.
    pub mean_delta_vs_actual_pct: Option<Decimal>,
    /// Positions where this strategy ranked first.
    pub times_ranked_best: u64,
}

impl StrategySummary {
    /// Summarize `strategy_id` over `comparisons`.
    #[must_use]
    pub fn from_comparisons(strategy_id: &StrategyId, comparisons: &[StrategyComparison]) -> Self {
        let mut positions = 0_u64;
        let mut wins = 0_u64;
        let mut best = 0_u64;
        let mut pnl_sum = Decimal::ZERO;
        let mut abs_sum = Decimal::ZERO;
        let mut delta_sum = Decimal::ZERO;
        let mut delta_count = 0_u64;

        for ranked in comparisons
            .iter()
            .flat_map(|c| c.rankings.iter())
            .filter(|r| &r.result.strategy_id == strategy_id)
        {
            positions += 1;
            pnl_sum = pnl_sum.saturating_add(ranked.result.final_pnl_pct);
            abs_sum = abs_sum.saturating_add(ranked.result.final_pnl_abs);
            if ranked.result.is_profitable() {
                wins += 1;
            }
            if ranked.rank == 1 {
                best += 1;
            }
            if let Some(delta) = ranked.delta_vs_actual_pct {
                delta_sum = delta_sum.saturating_add(delta);
                delta_count += 1;
            }
        }

        let mean = |sum: Decimal, count: u64| {
            if count == 0 {
                Decimal::ZERO
            } else {
                (sum / Decimal::from(count)).round_dp(SUMMARY_DP).normalize()
            }
        };

        Self {
            strategy_id: strategy_id.clone(),
            positions_simulated: positions,
            mean_pnl_pct: mean(pnl_sum, positions),
            total_pnl_abs: abs_sum.normalize(),
            win_rate_pct: mean(Decimal::from(wins) * HUNDRED, positions),
            mean_delta_vs_actual_pct: (delta_count > 0).then(|| mean(delta_sum, delta_count)),
            times_ranked_best: best,
        }
    }
}

/// Outcome of a batch analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Run identifier.
    pub run_id: BatchRunId,
    /// Strategies compared, sorted by id.
    pub strategy_ids: Vec<StrategyId>,
    /// Positions in the batch.
    pub positions_total: u64,
    /// Per-position rankings, in input order.
    pub comparisons: Vec<StrategyComparison>,
    /// Positions that could not be simulated.
    pub skipped: Vec<SkippedPosition>,
    /// Per-strategy aggregates, in `strategy_ids` order.
    pub summaries: Vec<StrategySummary>,
    /// Wall-clock time of the batch in milliseconds.
    pub total_time_ms: u64,
}

impl BatchReport {
    /// Assemble a report and compute strategy summaries.
    #[must_use]
    pub fn build(
        strategy_ids: Vec<StrategyId>,
        comparisons: Vec<StrategyComparison>,
        skipped: Vec<SkippedPosition>,
        total_time_ms: u64,
    ) -> Self {
        let summaries = strategy_ids
            .iter()
            .map(|id| StrategySummary::from_comparisons(id, &comparisons))
            .collect();

        Self {
            run_id: BatchRunId::generate(),
            strategy_ids,
            positions_total: (comparisons.len() + skipped.len()) as u64,
            comparisons,
            skipped,
            summaries,
            total_time_ms,
        }
    }

    /// Summary of one strategy.
    #[must_use]
    pub fn summary(&self, strategy_id: &StrategyId) -> Option<&StrategySummary> {
        self.summaries.iter().find(|s| &s.strategy_id == strategy_id)
    }

    /// Strategy with the highest mean PnL, ties broken by id.
    #[must_use]
    pub fn best_strategy(&self) -> Option<&StrategySummary> {
        self.summaries
            .iter()
            .filter(|s| s.positions_simulated > 0)
            .max_by(|a, b| {
                a.mean_pnl_pct
                    .cmp(&b.mean_pnl_pct)
                    .then_with(|| b.strategy_id.cmp(&a.strategy_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comparison::Comparator;
    use crate::domain::position::PositionRecord;
    use crate::domain::shared::Timestamp;
    use crate::domain::simulation::{PositionEntry, SimulationOutcome, SimulationResult};
    use rust_decimal_macros::dec;

    fn result(strategy: &str, pnl: Decimal) -> SimulationResult {
        SimulationResult {
            strategy_id: strategy.into(),
            outcome: SimulationOutcome::Exited,
            final_pnl_pct: pnl,
            final_pnl_abs: pnl * dec!(2),
            events: Vec::new(),
            remaining_pct: Decimal::ZERO,
            last_price: Some(dec!(1)),
            first_exit_at: None,
            last_exit_at: None,
            total_duration_hours: Decimal::ZERO,
            peak_price: dec!(1),
            trough_price: dec!(1),
            max_gain_pct: Decimal::ZERO,
            max_loss_pct: Decimal::ZERO,
            trailing_stop_price: None,
            ticks_processed: 1,
        }
    }

    fn comparison(id: &str, actual: Option<Decimal>, a: Decimal, b: Decimal) -> StrategyComparison {
        let mut position = PositionRecord::new(
            id,
            "TOKEN",
            PositionEntry::new(dec!(1), Timestamp::parse("2026-01-01T00:00:00Z").unwrap(), dec!(200)),
        );
        position.actual_pnl_pct = actual;
        Comparator::compare(&position, vec![result("a", a), result("b", b)])
    }

    #[test]
    fn summaries_aggregate_across_positions() {
        let comparisons = vec![
            comparison("p1", Some(dec!(10)), dec!(30), dec!(-10)),
            comparison("p2", None, dec!(-6), dec!(20)),
        ];
        let report = BatchReport::build(
            vec!["a".into(), "b".into()],
            comparisons,
            vec![SkippedPosition {
                position_id: "p3".into(),
                reason: "bad".to_string(),
            }],
            12,
        );

        assert_eq!(report.positions_total, 3);

        let a = report.summary(&"a".into()).unwrap();
        assert_eq!(a.positions_simulated, 2);
        assert_eq!(a.mean_pnl_pct, dec!(12));
        assert_eq!(a.total_pnl_abs, dec!(48));
        assert_eq!(a.win_rate_pct, dec!(50));
        assert_eq!(a.mean_delta_vs_actual_pct, Some(dec!(20)));
        assert_eq!(a.times_ranked_best, 1);

        let b = report.summary(&"b".into()).unwrap();
        assert_eq!(b.mean_pnl_pct, dec!(5));
        assert_eq!(b.mean_delta_vs_actual_pct, Some(dec!(-20)));

        assert_eq!(report.best_strategy().unwrap().strategy_id.as_str(), "a");
    }

    #[test]
    fn unused_strategy_has_empty_summary() {
        let report = BatchReport::build(vec!["z".into()], Vec::new(), Vec::new(), 0);
        let z = report.summary(&"z".into()).unwrap();
        assert_eq!(z.positions_simulated, 0);
        assert_eq!(z.mean_pnl_pct, Decimal::ZERO);
        assert!(z.mean_delta_vs_actual_pct.is_none());
        assert!(report.best_strategy().is_none());
    }
}
