//! Position entry data consumed by a simulation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Timestamp;
use crate::domain::simulation::errors::SimulationError;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Entry facts of a position.
///
/// `already_exited_pct` and `realized_pnl_pct` describe exits that happened
/// before the simulated window; the simulation only governs the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionEntry {
    /// Average entry price.
    pub entry_price: Decimal,
    /// When the position was opened.
    pub entry_time: Timestamp,
    /// Cost basis in quote currency.
    pub position_size: Decimal,
    /// Share of the original size already sold, in percent.
    #[serde(default)]
    pub already_exited_pct: Decimal,
    /// PnL realized on the already-exited share, in percent.
    #[serde(default)]
    pub realized_pnl_pct: Decimal,
}

impl PositionEntry {
    /// Entry with no prior exits.
    #[must_use]
    pub const fn new(entry_price: Decimal, entry_time: Timestamp, position_size: Decimal) -> Self {
        Self {
            entry_price,
            entry_time,
            position_size,
            already_exited_pct: Decimal::ZERO,
            realized_pnl_pct: Decimal::ZERO,
        }
    }

    /// Record a prior partial exit.
    #[must_use]
    pub const fn with_prior_exit(mut self, exited_pct: Decimal, realized_pnl_pct: Decimal) -> Self {
        self.already_exited_pct = exited_pct;
        self.realized_pnl_pct = realized_pnl_pct;
        self
    }

    /// Share of the original size still held at entry of the simulated window.
    #[must_use]
    pub fn initial_remaining_pct(&self) -> Decimal {
        HUNDRED - self.already_exited_pct
    }

    /// PnL of `price` relative to the entry price, in percent.
    ///
    /// `None` when the result does not fit in a [`Decimal`].
    #[must_use]
    pub fn pnl_pct_at(&self, price: Decimal) -> Option<Decimal> {
        price
            .checked_sub(self.entry_price)?
            .checked_div(self.entry_price)?
            .checked_mul(HUNDRED)
    }

    /// Check the entry facts.
    ///
    /// # Errors
    /// Returns [`SimulationError`] for a non-positive entry price, a negative
    /// size, or a prior exit outside `[0, 100]`.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.entry_price <= Decimal::ZERO {
            return Err(SimulationError::NonPositiveEntryPrice {
                price: self.entry_price,
            });
        }
        if self.position_size < Decimal::ZERO {
            return Err(SimulationError::NegativePositionSize {
                size: self.position_size,
            });
        }
        if self.already_exited_pct < Decimal::ZERO || self.already_exited_pct > HUNDRED {
            return Err(SimulationError::AlreadyExitedOutOfRange {
                value: self.already_exited_pct,
            });
        }
        Ok(())
    }
}
