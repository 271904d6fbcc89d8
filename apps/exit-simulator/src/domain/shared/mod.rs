//! Shared Domain Types
//!
//! Value objects shared across the strategy, simulation and comparison contexts.

pub mod value_objects;

pub use value_objects::{BatchRunId, PositionId, StrategyId, Timestamp, TokenId};
