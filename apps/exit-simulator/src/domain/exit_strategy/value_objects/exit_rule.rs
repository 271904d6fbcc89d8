//! Exit rule value objects.
//!
//! [`ExitRule`] is the validated, closed set of rule variants the simulator
//! dispatches on. [`ExitRuleDefinition`] is the flat catalog record it is
//! built from; every catalog row carries the same columns and the rule type
//! decides which of them are required.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::exit_strategy::errors::StrategyError;

/// Discriminant of an exit rule, as stored in the catalog's `rule_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Sell when profit reaches a threshold.
    TakeProfit,
    /// Sell when loss reaches a threshold.
    StopLoss,
    /// Sell when price falls back to a floor that follows the peak.
    TrailingStop,
    /// Sell everything once the position has been held too long.
    TimeBased,
    /// Sell everything when price has not moved for a while.
    Stagnation,
}

impl RuleKind {
    /// Catalog name of the rule type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TakeProfit => "take_profit",
            Self::StopLoss => "stop_loss",
            Self::TrailingStop => "trailing_stop",
            Self::TimeBased => "time_based",
            Self::Stagnation => "stagnation",
        }
    }

    /// Whether this kind is a global override rather than a per-tick trigger.
    #[must_use]
    pub const fn is_global_override(&self) -> bool {
        matches!(self, Self::TimeBased | Self::Stagnation)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated exit rule.
///
/// Percentages are relative to the entry price. `exit_pct` is a share of the
/// *original* position size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitRule {
    /// Fires when `pnl_pct >= trigger_pct`.
    TakeProfit {
        /// Profit threshold in percent.
        trigger_pct: Decimal,
        /// Share of the original size to sell.
        exit_pct: Decimal,
        /// Evaluation order, ascending.
        priority: i32,
        /// Disabled rules are never evaluated.
        enabled: bool,
    },
    /// Fires when `pnl_pct <= trigger_pct`; `trigger_pct` is normally negative.
    StopLoss {
        /// Loss threshold in percent.
        trigger_pct: Decimal,
        /// Share of the original size to sell.
        exit_pct: Decimal,
        /// Evaluation order, ascending.
        priority: i32,
        /// Disabled rules are never evaluated.
        enabled: bool,
    },
    /// Arms once `pnl_pct >= activation_pct`, then fires when price falls to
    /// `peak * (1 + trigger_pct / 100)`.
    TrailingStop {
        /// Distance of the floor below the peak, in percent (negative).
        trigger_pct: Decimal,
        /// Profit that arms the stop, in percent.
        activation_pct: Decimal,
        /// Share of the original size to sell.
        exit_pct: Decimal,
        /// Evaluation order, ascending.
        priority: i32,
        /// Disabled rules are never evaluated.
        enabled: bool,
    },
    /// Global override: full exit once held for `max_hold_hours`.
    TimeBased {
        /// Maximum holding time.
        max_hold_hours: Decimal,
        /// Disabled rules are ignored.
        enabled: bool,
    },
    /// Global override: full exit once held for `stagnation_hours` while
    /// `|pnl_pct| <= threshold_pct`.
    Stagnation {
        /// Minimum holding time before stagnation is checked.
        stagnation_hours: Decimal,
        /// Band around entry considered "not moving", in percent.
        threshold_pct: Decimal,
        /// Disabled rules are ignored.
        enabled: bool,
    },
}

impl ExitRule {
    /// Take-profit rule, enabled.
    #[must_use]
    pub const fn take_profit(trigger_pct: Decimal, exit_pct: Decimal, priority: i32) -> Self {
        Self::TakeProfit {
            trigger_pct,
            exit_pct,
            priority,
            enabled: true,
        }
    }

    /// Stop-loss rule, enabled.
    #[must_use]
    pub const fn stop_loss(trigger_pct: Decimal, exit_pct: Decimal, priority: i32) -> Self {
        Self::StopLoss {
            trigger_pct,
            exit_pct,
            priority,
            enabled: true,
        }
    }

    /// Trailing-stop rule, enabled.
    #[must_use]
    pub const fn trailing_stop(
        trigger_pct: Decimal,
        activation_pct: Decimal,
        exit_pct: Decimal,
        priority: i32,
    ) -> Self {
        Self::TrailingStop {
            trigger_pct,
            activation_pct,
            exit_pct,
            priority,
            enabled: true,
        }
    }

    /// Time-based override, enabled.
    #[must_use]
    pub const fn time_based(max_hold_hours: Decimal) -> Self {
        Self::TimeBased {
            max_hold_hours,
            enabled: true,
        }
    }

    /// Stagnation override, enabled.
    #[must_use]
    pub const fn stagnation(stagnation_hours: Decimal, threshold_pct: Decimal) -> Self {
        Self::Stagnation {
            stagnation_hours,
            threshold_pct,
            enabled: true,
        }
    }

    /// Return a copy with the enabled flag set.
    #[must_use]
    pub const fn with_enabled(mut self, value: bool) -> Self {
        match &mut self {
            Self::TakeProfit { enabled, .. }
            | Self::StopLoss { enabled, .. }
            | Self::TrailingStop { enabled, .. }
            | Self::TimeBased { enabled, .. }
            | Self::Stagnation { enabled, .. } => *enabled = value,
        }
        self
    }

    /// Rule discriminant.
    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::TakeProfit { .. } => RuleKind::TakeProfit,
            Self::StopLoss { .. } => RuleKind::StopLoss,
            Self::TrailingStop { .. } => RuleKind::TrailingStop,
            Self::TimeBased { .. } => RuleKind::TimeBased,
            Self::Stagnation { .. } => RuleKind::Stagnation,
        }
    }

    /// Whether the rule takes part in evaluation.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        match self {
            Self::TakeProfit { enabled, .. }
            | Self::StopLoss { enabled, .. }
            | Self::TrailingStop { enabled, .. }
            | Self::TimeBased { enabled, .. }
            | Self::Stagnation { enabled, .. } => *enabled,
        }
    }

    /// Evaluation priority; `None` for global overrides.
    #[must_use]
    pub const fn priority(&self) -> Option<i32> {
        match self {
            Self::TakeProfit { priority, .. }
            | Self::StopLoss { priority, .. }
            | Self::TrailingStop { priority, .. } => Some(*priority),
            Self::TimeBased { .. } | Self::Stagnation { .. } => None,
        }
    }

    /// Share of the original size this rule sells; `None` for global overrides,
    /// which always sell the whole remainder.
    #[must_use]
    pub const fn exit_pct(&self) -> Option<Decimal> {
        match self {
            Self::TakeProfit { exit_pct, .. }
            | Self::StopLoss { exit_pct, .. }
            | Self::TrailingStop { exit_pct, .. } => Some(*exit_pct),
            Self::TimeBased { .. } | Self::Stagnation { .. } => None,
        }
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), StrategyError> {
        if let Some(exit_pct) = self.exit_pct() {
            if exit_pct <= Decimal::ZERO || exit_pct > Decimal::ONE_HUNDRED {
                return Err(StrategyError::ExitPctOutOfRange {
                    index,
                    value: exit_pct,
                });
            }
        }

        match self {
            Self::TrailingStop { trigger_pct, .. }
                if *trigger_pct >= Decimal::ZERO || *trigger_pct <= -Decimal::ONE_HUNDRED =>
            {
                Err(StrategyError::TrailingDistanceOutOfRange {
                    index,
                    value: *trigger_pct,
                })
            }
            Self::TimeBased { max_hold_hours, .. } if *max_hold_hours <= Decimal::ZERO => {
                Err(StrategyError::NonPositiveHours {
                    field: "max_hold_hours",
                    value: *max_hold_hours,
                })
            }
            Self::Stagnation {
                stagnation_hours, ..
            } if *stagnation_hours <= Decimal::ZERO => Err(StrategyError::NonPositiveHours {
                field: "stagnation_hours",
                value: *stagnation_hours,
            }),
            Self::Stagnation { threshold_pct, .. } if *threshold_pct < Decimal::ZERO => {
                Err(StrategyError::NegativeThreshold {
                    field: "threshold_pct",
                    value: *threshold_pct,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Flat catalog record for one exit rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRuleDefinition {
    /// Rule type.
    pub rule_type: RuleKind,
    /// Threshold in percent (take-profit, stop-loss, trailing distance).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_pct: Option<Decimal>,
    /// Share of the original size to sell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_pct: Option<Decimal>,
    /// Trailing stop arming threshold in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_pct: Option<Decimal>,
    /// Holding time in hours (time-based, stagnation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Decimal>,
    /// Stagnation band in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_pct: Option<Decimal>,
    /// Evaluation order, ascending.
    #[serde(default)]
    pub priority: i32,
    /// Disabled rules are kept but never evaluated.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl ExitRuleDefinition {
    /// Convert into a validated rule.
    ///
    /// `index` is the rule's position in the strategy and is only used for
    /// error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError`] if a required field is missing or out of range.
    pub fn into_rule(self, index: usize) -> Result<ExitRule, StrategyError> {
        let kind = self.rule_type;
        let require = |value: Option<Decimal>, field: &'static str| {
            value.ok_or(StrategyError::MissingField { index, kind, field })
        };

        let rule = match kind {
            RuleKind::TakeProfit => ExitRule::TakeProfit {
                trigger_pct: require(self.trigger_pct, "trigger_pct")?,
                exit_pct: require(self.exit_pct, "exit_pct")?,
                priority: self.priority,
                enabled: self.enabled,
            },
            RuleKind::StopLoss => ExitRule::StopLoss {
                trigger_pct: require(self.trigger_pct, "trigger_pct")?,
                exit_pct: require(self.exit_pct, "exit_pct")?,
                priority: self.priority,
                enabled: self.enabled,
            },
            RuleKind::TrailingStop => ExitRule::TrailingStop {
                trigger_pct: require(self.trigger_pct, "trigger_pct")?,
                activation_pct: require(self.activation_pct, "activation_pct")?,
                exit_pct: require(self.exit_pct, "exit_pct")?,
                priority: self.priority,
                enabled: self.enabled,
            },
            RuleKind::TimeBased => ExitRule::TimeBased {
                max_hold_hours: require(self.hours, "hours")?,
                enabled: self.enabled,
            },
            RuleKind::Stagnation => ExitRule::Stagnation {
                stagnation_hours: require(self.hours, "hours")?,
                threshold_pct: require(self.threshold_pct, "threshold_pct")?,
                enabled: self.enabled,
            },
        };

        rule.validate(index)?;
        Ok(rule)
    }
}

impl From<ExitRule> for ExitRuleDefinition {
    fn from(rule: ExitRule) -> Self {
        let blank = |rule_type, priority, enabled| Self {
            rule_type,
            trigger_pct: None,
            exit_pct: None,
            activation_pct: None,
            hours: None,
            threshold_pct: None,
            priority,
            enabled,
        };

        match rule {
            ExitRule::TakeProfit {
                trigger_pct,
                exit_pct,
                priority,
                enabled,
            } => Self {
                trigger_pct: Some(trigger_pct),
                exit_pct: Some(exit_pct),
                ..blank(RuleKind::TakeProfit, priority, enabled)
            },
            ExitRule::StopLoss {
                trigger_pct,
                exit_pct,
                priority,
                enabled,
            } => Self {
                trigger_pct: Some(trigger_pct),
                exit_pct: Some(exit_pct),
                ..blank(RuleKind::StopLoss, priority, enabled)
            },
            ExitRule::TrailingStop {
                trigger_pct,
                activation_pct,
                exit_pct,
                priority,
                enabled,
            } => Self {
                trigger_pct: Some(trigger_pct),
                activation_pct: Some(activation_pct),
                exit_pct: Some(exit_pct),
                ..blank(RuleKind::TrailingStop, priority, enabled)
            },
            ExitRule::TimeBased {
                max_hold_hours,
                enabled,
            } => Self {
                hours: Some(max_hold_hours),
                ..blank(RuleKind::TimeBased, 0, enabled)
            },
            ExitRule::Stagnation {
                stagnation_hours,
                threshold_pct,
                enabled,
            } => Self {
                hours: Some(stagnation_hours),
                threshold_pct: Some(threshold_pct),
                ..blank(RuleKind::Stagnation, 0, enabled)
            },
        }
    }
}
