//! Simulation driver.
//!
//! Walks the price history once. Per tick: update the tracker, check the
//! global overrides, then the per-tick rules in priority order. The run stops
//! as soon as nothing is left to sell. A position that was fully exited before
//! the window only has its price statistics collected.

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::exit_strategy::ExitStrategy;
use crate::domain::simulation::errors::SimulationError;
use crate::domain::simulation::services::{
    PositionTracker, ResultAggregator, RuleEvaluator, RuleTrigger,
};
use crate::domain::simulation::value_objects::{
    ExitEvent, PositionEntry, PricePoint, SameTickPolicy, SimulationConfig, SimulationOutcome,
    SimulationResult,
};
use crate::observability::record_simulation;

/// Replays exit strategies over price histories.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationDriver {
    config: SimulationConfig,
}

impl SimulationDriver {
    /// Driver with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Driver with custom configuration.
    #[must_use]
    pub const fn with_config(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replay `strategy` over `history` for the position described by `entry`.
    ///
    /// An empty history is a valid input and yields
    /// [`SimulationOutcome::NoHistory`]. An entry with nothing left to sell
    /// yields [`SimulationOutcome::AlreadyClosed`] without evaluating rules.
    ///
    /// # Errors
    /// Returns [`SimulationError`] when the entry or the history is
    /// structurally invalid, or when a derived quantity overflows. No partial
    /// result is produced.
    pub fn simulate(
        &self,
        strategy: &ExitStrategy,
        entry: &PositionEntry,
        history: &[PricePoint],
    ) -> Result<SimulationResult, SimulationError> {
        let span = tracing::debug_span!(
            "simulate",
            strategy_id = %strategy.id(),
            points = history.len()
        );
        let _guard = span.enter();

        entry.validate()?;
        validate_history(entry, history)?;

        let mut tracker = PositionTracker::new(*entry, strategy);
        let mut events = Vec::new();
        let already_closed = tracker.is_flat();

        for point in history {
            if already_closed {
                tracker.observe(strategy, point)?;
                continue;
            }
            if tracker.is_flat() {
                break;
            }
            tracker.observe(strategy, point)?;

            if let Some(trigger) = RuleEvaluator::evaluate_overrides(strategy.overrides(), &tracker) {
                record_exit(&mut tracker, &mut events, None, trigger);
                break;
            }

            for (index, rule) in strategy.per_tick_rules() {
                let Some(trigger) = RuleEvaluator::evaluate_rule(rule, index, &tracker) else {
                    continue;
                };
                record_exit(&mut tracker, &mut events, Some(index), trigger);
                if self.config.same_tick_policy == SameTickPolicy::FirstTrigger
                    || tracker.is_flat()
                {
                    break;
                }
            }
        }

        let outcome = if already_closed {
            SimulationOutcome::AlreadyClosed
        } else if history.is_empty() {
            SimulationOutcome::NoHistory
        } else if tracker.is_flat() {
            SimulationOutcome::Exited
        } else {
            SimulationOutcome::Exhausted
        };

        let result = ResultAggregator::aggregate(strategy.id().clone(), outcome, events, &tracker)?;

        debug!(
            outcome = %result.outcome,
            final_pnl_pct = %result.final_pnl_pct,
            exits = result.events.len(),
            remaining_pct = %result.remaining_pct,
            ticks = result.ticks_processed,
            "Simulation finished"
        );
        record_simulation(result.outcome.as_str());

        Ok(result)
    }
}

fn record_exit(
    tracker: &mut PositionTracker,
    events: &mut Vec<ExitEvent>,
    rule_index: Option<usize>,
    trigger: RuleTrigger,
) {
    let sold = tracker.apply_exit(rule_index, trigger.exit_pct);
    let event = ExitEvent {
        timestamp: tracker.current_time(),
        rule_type: trigger.kind,
        trigger_value: trigger.trigger_value,
        fill_price: tracker.current_price(),
        exit_pct: sold,
        cumulative_exited_pct: tracker.cumulative_exited_pct(),
        pnl_pct: tracker.pnl_pct(),
        elapsed_hours: tracker.elapsed_hours(),
        priority: trigger.priority,
    };

    debug!(
        rule = %event.rule_type,
        fill_price = %event.fill_price,
        exit_pct = %event.exit_pct,
        pnl_pct = %event.pnl_pct,
        remaining_pct = %tracker.remaining_pct(),
        "Exit triggered"
    );

    events.push(event);
}

fn validate_history(entry: &PositionEntry, history: &[PricePoint]) -> Result<(), SimulationError> {
    let mut previous = entry.entry_time;
    for (index, point) in history.iter().enumerate() {
        if point.price < Decimal::ZERO {
            return Err(SimulationError::NegativePrice {
                index,
                price: point.price,
            });
        }
        if point.timestamp < entry.entry_time {
            return Err(SimulationError::BeforeEntry { index });
        }
        if point.timestamp < previous {
            return Err(SimulationError::OutOfOrder { index });
        }
        previous = point.timestamp;
    }
    Ok(())
}
