//! Per-run position state.

use rust_decimal::Decimal;

use crate::domain::exit_strategy::{ExitRule, ExitStrategy};
use crate::domain::shared::Timestamp;
use crate::domain::simulation::errors::SimulationError;
use crate::domain::simulation::value_objects::{PositionEntry, PricePoint};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Trailing-stop state of one rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrailingState {
    /// Floor price; `None` until the rule's activation threshold is reached.
    pub stop_price: Option<Decimal>,
}

/// Mutable state of one simulation run.
///
/// Rule state is indexed by the rule's position in
/// [`ExitStrategy::rules`].
#[derive(Debug, Clone)]
pub struct PositionTracker {
    entry: PositionEntry,
    remaining_pct: Decimal,
    cumulative_exited_pct: Decimal,
    current_price: Decimal,
    current_time: Timestamp,
    pnl_pct: Decimal,
    elapsed_hours: Decimal,
    peak_price: Decimal,
    trough_price: Decimal,
    max_gain_pct: Decimal,
    max_loss_pct: Decimal,
    fired: Vec<bool>,
    trailing: Vec<TrailingState>,
    ticks: usize,
}

impl PositionTracker {
    /// Fresh state at the entry price and time.
    #[must_use]
    pub fn new(entry: PositionEntry, strategy: &ExitStrategy) -> Self {
        let rule_count = strategy.rules().len();
        Self {
            entry,
            remaining_pct: entry.initial_remaining_pct(),
            cumulative_exited_pct: entry.already_exited_pct,
            current_price: entry.entry_price,
            current_time: entry.entry_time,
            pnl_pct: Decimal::ZERO,
            elapsed_hours: Decimal::ZERO,
            peak_price: entry.entry_price,
            trough_price: entry.entry_price,
            max_gain_pct: Decimal::ZERO,
            max_loss_pct: Decimal::ZERO,
            fired: vec![false; rule_count],
            trailing: vec![TrailingState::default(); rule_count],
            ticks: 0,
        }
    }

    /// Absorb one price point.
    ///
    /// Updates extremes and PnL, then arms or ratchets every enabled trailing
    /// stop that has not fired yet.
    ///
    /// # Errors
    /// Returns [`SimulationError::ArithmeticOverflow`] when the PnL or a
    /// trailing floor does not fit in a decimal. State is left untouched.
    pub fn observe(
        &mut self,
        strategy: &ExitStrategy,
        point: &PricePoint,
    ) -> Result<(), SimulationError> {
        let tick = self.ticks;
        let overflow = || SimulationError::ArithmeticOverflow { index: tick };
        let pnl_pct = self.entry.pnl_pct_at(point.price).ok_or_else(overflow)?;
        let peak_price = self.peak_price.max(point.price);
        let mut candidates = Vec::with_capacity(self.trailing.len());
        for (index, rule) in strategy.rules().iter().enumerate() {
            if let ExitRule::TrailingStop {
                trigger_pct,
                activation_pct,
                enabled: true,
                ..
            } = rule
            {
                if self.fired[index] {
                    continue;
                }
                let candidate = (*trigger_pct / HUNDRED)
                    .checked_add(Decimal::ONE)
                    .and_then(|factor| peak_price.checked_mul(factor))
                    .ok_or_else(overflow)?;
                candidates.push((index, *activation_pct, candidate));
            }
        }

        self.ticks += 1;
        self.current_price = point.price;
        self.current_time = point.timestamp;
        self.elapsed_hours = point.timestamp.hours_since(self.entry.entry_time);
        self.peak_price = peak_price;
        self.trough_price = self.trough_price.min(point.price);
        self.pnl_pct = pnl_pct;
        self.max_gain_pct = self.max_gain_pct.max(pnl_pct);
        self.max_loss_pct = self.max_loss_pct.min(pnl_pct);

        for (index, activation_pct, candidate) in candidates {
            let state = &mut self.trailing[index];
            match state.stop_price {
                Some(floor) => state.stop_price = Some(floor.max(candidate)),
                None if pnl_pct >= activation_pct => state.stop_price = Some(candidate),
                None => {}
            }
        }
        Ok(())
    }

    /// Apply an exit of `exit_pct` of the original size, capped to the
    /// remainder. Marks `rule_index` as fired when given.
    ///
    /// Returns the share actually sold.
    pub fn apply_exit(&mut self, rule_index: Option<usize>, exit_pct: Decimal) -> Decimal {
        let sold = exit_pct.min(self.remaining_pct).max(Decimal::ZERO);
        self.remaining_pct -= sold;
        self.cumulative_exited_pct = (self.cumulative_exited_pct + sold).min(HUNDRED);
        if let Some(index) = rule_index {
            if let Some(flag) = self.fired.get_mut(index) {
                *flag = true;
            }
        }
        sold
    }

    /// Whether the rule at `index` has already fired.
    #[must_use]
    pub fn has_fired(&self, index: usize) -> bool {
        self.fired.get(index).copied().unwrap_or(false)
    }

    /// Trailing state of the rule at `index`.
    #[must_use]
    pub fn trailing(&self, index: usize) -> TrailingState {
        self.trailing.get(index).copied().unwrap_or_default()
    }

    /// Highest armed trailing floor, if any.
    #[must_use]
    pub fn trailing_stop_price(&self) -> Option<Decimal> {
        self.trailing.iter().filter_map(|t| t.stop_price).max()
    }

    /// Whether nothing is left to sell.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.remaining_pct <= Decimal::ZERO
    }

    /// Entry facts.
    #[must_use]
    pub const fn entry(&self) -> &PositionEntry {
        &self.entry
    }

    /// Share of the original size still held.
    #[must_use]
    pub const fn remaining_pct(&self) -> Decimal {
        self.remaining_pct
    }

    /// Share of the original size sold, including prior exits.
    #[must_use]
    pub const fn cumulative_exited_pct(&self) -> Decimal {
        self.cumulative_exited_pct
    }

    /// Latest observed price, or the entry price before the first tick.
    #[must_use]
    pub const fn current_price(&self) -> Decimal {
        self.current_price
    }

    /// Latest observation time, or the entry time before the first tick.
    #[must_use]
    pub const fn current_time(&self) -> Timestamp {
        self.current_time
    }

    /// PnL at the latest price, in percent.
    #[must_use]
    pub const fn pnl_pct(&self) -> Decimal {
        self.pnl_pct
    }

    /// Hours since entry at the latest observation.
    #[must_use]
    pub const fn elapsed_hours(&self) -> Decimal {
        self.elapsed_hours
    }

    /// Highest price seen.
    #[must_use]
    pub const fn peak_price(&self) -> Decimal {
        self.peak_price
    }

    /// Lowest price seen.
    #[must_use]
    pub const fn trough_price(&self) -> Decimal {
        self.trough_price
    }

    /// Best PnL seen, in percent.
    #[must_use]
    pub const fn max_gain_pct(&self) -> Decimal {
        self.max_gain_pct
    }

    /// Worst PnL seen, in percent.
    #[must_use]
    pub const fn max_loss_pct(&self) -> Decimal {
        self.max_loss_pct
    }

    /// Price points observed.
    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }
}
