//! Exit event value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::exit_strategy::RuleKind;
use crate::domain::shared::Timestamp;

/// A simulated sale of part or all of a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitEvent {
    /// Time of the price point that triggered the exit.
    pub timestamp: Timestamp,
    /// Rule that fired.
    pub rule_type: RuleKind,
    /// Threshold that was crossed: the rule's `trigger_pct` for take-profit
    /// and stop-loss, the floor price for a trailing stop, the hold limit in
    /// hours for time-based exits, the band in percent for stagnation.
    pub trigger_value: Decimal,
    /// Price the exit filled at.
    pub fill_price: Decimal,
    /// Share of the original size sold, in percent.
    pub exit_pct: Decimal,
    /// Share of the original size sold so far, including this event.
    pub cumulative_exited_pct: Decimal,
    /// PnL of the fill relative to entry, in percent.
    pub pnl_pct: Decimal,
    /// Hours between entry and this exit.
    pub elapsed_hours: Decimal,
    /// Priority of the firing rule; `None` for global overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl ExitEvent {
    /// Whether the exit came from a global override.
    #[must_use]
    pub const fn is_override(&self) -> bool {
        self.priority.is_none()
    }
}
