//! Strategy-wide exit overrides.
//!
//! Time-based and stagnation exits are not ranked with the per-tick rules;
//! they are checked first on every tick and always close the whole
//! remainder.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A "price is not moving" window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagnationWindow {
    /// Minimum holding time before the window applies.
    pub hours: Decimal,
    /// Maximum absolute PnL, in percent, still considered flat.
    pub threshold_pct: Decimal,
}

impl StagnationWindow {
    /// Create a new window.
    #[must_use]
    pub const fn new(hours: Decimal, threshold_pct: Decimal) -> Self {
        Self {
            hours,
            threshold_pct,
        }
    }

    /// Whether a position held for `elapsed_hours` at `pnl_pct` is stagnant.
    #[must_use]
    pub fn is_stagnant(&self, elapsed_hours: Decimal, pnl_pct: Decimal) -> bool {
        elapsed_hours >= self.hours && pnl_pct.abs() <= self.threshold_pct
    }
}

/// Effective global overrides of a strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOverrides {
    max_hold_hours: Option<Decimal>,
    stagnation: Vec<StagnationWindow>,
}

impl GlobalOverrides {
    /// Create overrides from a hold limit and stagnation windows.
    #[must_use]
    pub const fn new(max_hold_hours: Option<Decimal>, stagnation: Vec<StagnationWindow>) -> Self {
        Self {
            max_hold_hours,
            stagnation,
        }
    }

    /// Tightest maximum holding time, if any.
    #[must_use]
    pub const fn max_hold_hours(&self) -> Option<Decimal> {
        self.max_hold_hours
    }

    /// All stagnation windows, in declaration order.
    #[must_use]
    pub fn stagnation_windows(&self) -> &[StagnationWindow] {
        &self.stagnation
    }

    /// Whether the hold limit has been reached.
    #[must_use]
    pub fn hold_limit_reached(&self, elapsed_hours: Decimal) -> bool {
        self.max_hold_hours
            .is_some_and(|limit| elapsed_hours >= limit)
    }

    /// First stagnation window satisfied by the current state.
    #[must_use]
    pub fn stagnant_window(
        &self,
        elapsed_hours: Decimal,
        pnl_pct: Decimal,
    ) -> Option<&StagnationWindow> {
        self.stagnation
            .iter()
            .find(|window| window.is_stagnant(elapsed_hours, pnl_pct))
    }

    /// True when neither override is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_hold_hours.is_none() && self.stagnation.is_empty()
    }
}
