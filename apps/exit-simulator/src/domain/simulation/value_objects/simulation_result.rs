//! Simulation result value object.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{StrategyId, Timestamp};
use crate::domain::simulation::value_objects::ExitEvent;

/// How a simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationOutcome {
    /// The whole position was sold.
    Exited,
    /// The history ran out with part of the position still held.
    Exhausted,
    /// There was no price history to replay.
    NoHistory,
    /// The position was fully exited before the window; no rule was evaluated.
    AlreadyClosed,
}

impl SimulationOutcome {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exited => "exited",
            Self::Exhausted => "exhausted",
            Self::NoHistory => "no_history",
            Self::AlreadyClosed => "already_closed",
        }
    }
}

impl fmt::Display for SimulationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of replaying one strategy over one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Strategy that was replayed.
    pub strategy_id: StrategyId,
    /// How the run ended.
    pub outcome: SimulationOutcome,
    /// Weighted PnL over the whole original size, in percent.
    pub final_pnl_pct: Decimal,
    /// `final_pnl_pct` applied to the cost basis.
    pub final_pnl_abs: Decimal,
    /// Exits in chronological order.
    pub events: Vec<ExitEvent>,
    /// Share of the original size never sold, in percent.
    pub remaining_pct: Decimal,
    /// Last observed price, if any.
    pub last_price: Option<Decimal>,
    /// Time of the first exit.
    pub first_exit_at: Option<Timestamp>,
    /// Time of the last exit.
    pub last_exit_at: Option<Timestamp>,
    /// Entry to final exit, or entry to last observation when exhausted.
    pub total_duration_hours: Decimal,
    /// Highest price seen, starting from entry.
    pub peak_price: Decimal,
    /// Lowest price seen, starting from entry.
    pub trough_price: Decimal,
    /// Best unrealized PnL seen, in percent.
    pub max_gain_pct: Decimal,
    /// Worst unrealized PnL seen, in percent.
    pub max_loss_pct: Decimal,
    /// Highest armed trailing floor when the run stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_stop_price: Option<Decimal>,
    /// Price points consumed before the run stopped.
    pub ticks_processed: usize,
}

impl SimulationResult {
    /// Whether the strategy sold anything.
    #[must_use]
    pub fn has_exits(&self) -> bool {
        !self.events.is_empty()
    }

    /// Whether the run ended in profit.
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.final_pnl_pct > Decimal::ZERO
    }
}
