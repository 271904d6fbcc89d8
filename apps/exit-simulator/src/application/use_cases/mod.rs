//! Application Use Cases

mod analyze_batch;
mod compare_strategies;
mod simulate_position;

pub use analyze_batch::{AnalyzeBatchUseCase, BatchRequest};
pub use compare_strategies::CompareStrategiesUseCase;
pub use simulate_position::SimulatePositionUseCase;
