//! Exit Strategy Errors

use rust_decimal::Decimal;
use thiserror::Error;

use super::value_objects::RuleKind;

/// Structural problems found while building an exit strategy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// Strategy identifier is empty.
    #[error("Strategy id must not be empty")]
    EmptyId,

    /// A rule is missing a field its type requires.
    #[error("Rule #{index} ({kind}) is missing required field '{field}'")]
    MissingField {
        /// Position of the rule in the strategy definition.
        index: usize,
        /// Rule type.
        kind: RuleKind,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Exit fraction outside (0, 100].
    #[error("Rule #{index} exit_pct must be in (0, 100], got {value}")]
    ExitPctOutOfRange {
        /// Position of the rule in the strategy definition.
        index: usize,
        /// Offending value.
        value: Decimal,
    },

    /// Trailing distance outside (-100, 0).
    #[error("Rule #{index} trailing trigger_pct must be in (-100, 0), got {value}")]
    TrailingDistanceOutOfRange {
        /// Position of the rule in the strategy definition.
        index: usize,
        /// Offending value.
        value: Decimal,
    },

    /// A duration is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveHours {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// Stagnation threshold is negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeThreshold {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// Only one of `stagnation_hours` / `stagnation_threshold_pct` was set.
    #[error("stagnation_hours and stagnation_threshold_pct must be set together")]
    IncompleteStagnation,
}
