//! Strategy comparator.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::position::PositionRecord;
use crate::domain::shared::PositionId;
use crate::domain::simulation::SimulationResult;

/// One strategy's placement in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedResult {
    /// 1-based rank, best first.
    pub rank: usize,
    /// `final_pnl_pct` minus the actual outcome, when the actual is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_vs_actual_pct: Option<Decimal>,
    /// The simulation.
    pub result: SimulationResult,
}

/// Ranked results for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// Position the strategies were replayed on.
    pub position_id: PositionId,
    /// Actual PnL of the real trade, if closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_pnl_pct: Option<Decimal>,
    /// Results, best first.
    pub rankings: Vec<RankedResult>,
}

impl StrategyComparison {
    /// Best-ranked result.
    #[must_use]
    pub fn best(&self) -> Option<&RankedResult> {
        self.rankings.first()
    }

    /// Whether the best strategy beat the real trade.
    #[must_use]
    pub fn best_beats_actual(&self) -> bool {
        self.best()
            .and_then(|r| r.delta_vs_actual_pct)
            .is_some_and(|delta| delta > Decimal::ZERO)
    }
}

/// Ranks strategies by weighted PnL.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator;

impl Comparator {
    /// Rank `results` for `position`.
    ///
    /// Higher `final_pnl_pct` ranks first; ties are broken by strategy id so
    /// the ordering is stable across runs.
    #[must_use]
    pub fn compare(position: &PositionRecord, mut results: Vec<SimulationResult>) -> StrategyComparison {
        results.sort_by(|a, b| match b.final_pnl_pct.cmp(&a.final_pnl_pct) {
            Ordering::Equal => a.strategy_id.cmp(&b.strategy_id),
            other => other,
        });

        let actual = position.actual_pnl_pct;
        let rankings = results
            .into_iter()
            .enumerate()
            .map(|(i, result)| RankedResult {
                rank: i + 1,
                delta_vs_actual_pct: actual.map(|a| result.final_pnl_pct.saturating_sub(a)),
                result,
            })
            .collect();

        StrategyComparison {
            position_id: position.id.clone(),
            actual_pnl_pct: actual,
            rankings,
        }
    }
}
