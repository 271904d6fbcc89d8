//! Exit Strategy Aggregate

mod exit_strategy;

pub use exit_strategy::{ExitStrategy, ExitStrategyBuilder, ExitStrategyDefinition};
