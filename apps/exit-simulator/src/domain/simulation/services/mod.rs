//! Simulation Domain Services

mod position_tracker;
mod result_aggregator;
mod rule_evaluator;
mod simulation_driver;

pub use position_tracker::{PositionTracker, TrailingState};
pub use result_aggregator::ResultAggregator;
pub use rule_evaluator::{RuleEvaluator, RuleTrigger};
pub use simulation_driver::SimulationDriver;
