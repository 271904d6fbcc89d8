//! Simulation Value Objects

mod exit_event;
mod position_entry;
mod price_point;
mod simulation_config;
mod simulation_result;

pub use exit_event::ExitEvent;
pub use position_entry::PositionEntry;
pub use price_point::PricePoint;
pub use simulation_config::{SameTickPolicy, SimulationConfig};
pub use simulation_result::{SimulationOutcome, SimulationResult};
