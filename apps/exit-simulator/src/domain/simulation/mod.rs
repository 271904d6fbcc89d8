//! Simulation Bounded Context
//!
//! Replays an [`ExitStrategy`](crate::domain::exit_strategy::ExitStrategy)
//! over a position's price history. A run is synchronous, owns all of its
//! mutable state, and produces an immutable [`SimulationResult`].

pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::SimulationError;
pub use services::{PositionTracker, ResultAggregator, RuleEvaluator, RuleTrigger, SimulationDriver};
pub use value_objects::{
    ExitEvent, PositionEntry, PricePoint, SameTickPolicy, SimulationConfig, SimulationOutcome,
    SimulationResult,
};
