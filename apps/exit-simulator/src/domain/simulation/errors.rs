//! Simulation Errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Structural problems with simulation inputs.
///
/// Empty history and untriggered strategies are normal outcomes, not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Entry price must be strictly positive.
    #[error("entry price must be positive, got {price}")]
    NonPositiveEntryPrice {
        /// The rejected entry price.
        price: Decimal,
    },

    /// Position size is a cost basis and cannot be negative.
    #[error("position size must not be negative, got {size}")]
    NegativePositionSize {
        /// The rejected size.
        size: Decimal,
    },

    /// Prior exit fraction must lie in `[0, 100]`.
    #[error("already exited percentage must be within [0, 100], got {value}")]
    AlreadyExitedOutOfRange {
        /// The rejected fraction.
        value: Decimal,
    },

    /// A price point carries a negative price.
    #[error("price point {index} has negative price {price}")]
    NegativePrice {
        /// Index into the history.
        index: usize,
        /// The rejected price.
        price: Decimal,
    },

    /// Price history is not sorted by timestamp.
    #[error("price point {index} is earlier than the point before it")]
    OutOfOrder {
        /// Index of the first out-of-order point.
        index: usize,
    },

    /// A price point predates the position's entry.
    #[error("price point {index} is earlier than the entry time")]
    BeforeEntry {
        /// Index into the history.
        index: usize,
    },

    /// A derived quantity does not fit in a decimal.
    #[error("arithmetic overflow at price point {index}")]
    ArithmeticOverflow {
        /// Index of the price point being processed.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn error_display() {
        let err = SimulationError::NonPositiveEntryPrice { price: dec!(0) };
        assert_eq!(err.to_string(), "entry price must be positive, got 0");

        let err = SimulationError::OutOfOrder { index: 3 };
        assert_eq!(
            err.to_string(),
            "price point 3 is earlier than the point before it"
        );

        let err = SimulationError::AlreadyExitedOutOfRange { value: dec!(101) };
        assert_eq!(
            err.to_string(),
            "already exited percentage must be within [0, 100], got 101"
        );

        let err = SimulationError::ArithmeticOverflow { index: 0 };
        assert_eq!(err.to_string(), "arithmetic overflow at price point 0");
    }
}
