//! Exit Strategy Bounded Context
//!
//! An exit strategy is an ordered set of rules that decide when, and how much
//! of, a position is sold. Strategies are validated once at construction so a
//! malformed rule can never surface in the middle of a simulation.

pub mod aggregate;
pub mod errors;
pub mod value_objects;

pub use aggregate::{ExitStrategy, ExitStrategyBuilder, ExitStrategyDefinition};
pub use errors::StrategyError;
pub use value_objects::{ExitRule, ExitRuleDefinition, GlobalOverrides, RuleKind, StagnationWindow};
