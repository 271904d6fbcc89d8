//! Result aggregation.

use rust_decimal::Decimal;

use crate::domain::shared::StrategyId;
use crate::domain::simulation::errors::SimulationError;
use crate::domain::simulation::services::PositionTracker;
use crate::domain::simulation::value_objects::{ExitEvent, SimulationOutcome, SimulationResult};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Turns a finished run into a [`SimulationResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    /// Weighted PnL over the original size.
    ///
    /// Each exit contributes its share times its PnL; whatever is still held
    /// is marked at the last price; prior exits contribute their realized PnL.
    ///
    /// `None` when the sum does not fit in a [`Decimal`].
    #[must_use]
    pub fn weighted_pnl_pct(events: &[ExitEvent], tracker: &PositionTracker) -> Option<Decimal> {
        let share = |pct: Decimal, pnl: Decimal| (pct / HUNDRED).checked_mul(pnl);
        let entry = tracker.entry();
        let mut total = share(entry.already_exited_pct, entry.realized_pnl_pct)?
            .checked_add(share(tracker.remaining_pct(), tracker.pnl_pct())?)?;
        for event in events {
            total = total.checked_add(share(event.exit_pct, event.pnl_pct)?)?;
        }
        Some(total)
    }

    /// Build the final result.
    ///
    /// # Errors
    /// Returns [`SimulationError::ArithmeticOverflow`] when the weighted or
    /// absolute PnL does not fit in a decimal.
    pub fn aggregate(
        strategy_id: StrategyId,
        outcome: SimulationOutcome,
        events: Vec<ExitEvent>,
        tracker: &PositionTracker,
    ) -> Result<SimulationResult, SimulationError> {
        let overflow = || SimulationError::ArithmeticOverflow {
            index: tracker.ticks().saturating_sub(1),
        };
        let final_pnl_pct = Self::weighted_pnl_pct(&events, tracker).ok_or_else(overflow)?;
        let final_pnl_abs = tracker
            .entry()
            .position_size
            .checked_mul(final_pnl_pct)
            .ok_or_else(overflow)?
            / HUNDRED;

        let total_duration_hours = match (outcome, events.last()) {
            (SimulationOutcome::Exited, Some(last)) => last.elapsed_hours,
            _ => tracker.elapsed_hours(),
        };
        let last_price = (tracker.ticks() > 0).then(|| tracker.current_price());

        Ok(SimulationResult {
            strategy_id,
            outcome,
            final_pnl_pct: final_pnl_pct.normalize(),
            final_pnl_abs: final_pnl_abs.normalize(),
            first_exit_at: events.first().map(|e| e.timestamp),
            last_exit_at: events.last().map(|e| e.timestamp),
            events,
            remaining_pct: tracker.remaining_pct(),
            last_price,
            total_duration_hours: total_duration_hours.normalize(),
            peak_price: tracker.peak_price(),
            trough_price: tracker.trough_price(),
            max_gain_pct: tracker.max_gain_pct(),
            max_loss_pct: tracker.max_loss_pct(),
            trailing_stop_price: tracker.trailing_stop_price(),
            ticks_processed: tracker.ticks(),
        })
    }
}
