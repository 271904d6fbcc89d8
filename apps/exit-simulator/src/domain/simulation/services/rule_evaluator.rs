//! Rule evaluation.
//!
//! Pure functions of the current tracker state. The evaluator never mutates
//! state; the driver applies whatever it reports.

use rust_decimal::Decimal;

use crate::domain::exit_strategy::{ExitRule, GlobalOverrides, RuleKind};
use crate::domain::simulation::services::PositionTracker;

/// A rule or override that fired on the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleTrigger {
    /// Kind of the firing rule.
    pub kind: RuleKind,
    /// Threshold that was crossed.
    pub trigger_value: Decimal,
    /// Share of the original size to sell, already capped to the remainder.
    pub exit_pct: Decimal,
    /// Rule priority; `None` for global overrides.
    pub priority: Option<i32>,
}

/// Decides whether rules fire.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEvaluator;

impl RuleEvaluator {
    /// Check the global overrides, time-based first.
    ///
    /// A firing override always sells the whole remainder.
    #[must_use]
    pub fn evaluate_overrides(
        overrides: &GlobalOverrides,
        tracker: &PositionTracker,
    ) -> Option<RuleTrigger> {
        let elapsed = tracker.elapsed_hours();
        let remaining = tracker.remaining_pct();

        if overrides.hold_limit_reached(elapsed) {
            if let Some(limit) = overrides.max_hold_hours() {
                return Some(RuleTrigger {
                    kind: RuleKind::TimeBased,
                    trigger_value: limit,
                    exit_pct: remaining,
                    priority: None,
                });
            }
        }

        overrides
            .stagnant_window(elapsed, tracker.pnl_pct())
            .map(|window| RuleTrigger {
                kind: RuleKind::Stagnation,
                trigger_value: window.threshold_pct,
                exit_pct: remaining,
                priority: None,
            })
    }

    /// Check one per-tick rule.
    ///
    /// Returns `None` for disabled rules, rules that already fired, global
    /// override variants, and when nothing is left to sell.
    #[must_use]
    pub fn evaluate_rule(
        rule: &ExitRule,
        index: usize,
        tracker: &PositionTracker,
    ) -> Option<RuleTrigger> {
        if !rule.is_enabled() || tracker.has_fired(index) || tracker.is_flat() {
            return None;
        }

        let pnl = tracker.pnl_pct();
        let (trigger_value, exit_pct, priority) = match *rule {
            ExitRule::TakeProfit {
                trigger_pct,
                exit_pct,
                priority,
                ..
            } if pnl >= trigger_pct => (trigger_pct, exit_pct, priority),
            ExitRule::StopLoss {
                trigger_pct,
                exit_pct,
                priority,
                ..
            } if pnl <= trigger_pct => (trigger_pct, exit_pct, priority),
            ExitRule::TrailingStop {
                exit_pct, priority, ..
            } => {
                let floor = tracker.trailing(index).stop_price?;
                if tracker.current_price() > floor {
                    return None;
                }
                (floor, exit_pct, priority)
            }
            ExitRule::TakeProfit { .. }
            | ExitRule::StopLoss { .. }
            | ExitRule::TimeBased { .. }
            | ExitRule::Stagnation { .. } => return None,
        };

        Some(RuleTrigger {
            kind: rule.kind(),
            trigger_value,
            exit_pct: exit_pct.min(tracker.remaining_pct()),
            priority: Some(priority),
        })
    }
}
