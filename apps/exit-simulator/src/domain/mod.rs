//! Domain Layer
//!
//! Pure business logic with no I/O. Everything here is synchronous and
//! deterministic.
//!
//! # Bounded Contexts
//!
//! - [`exit_strategy`]: Validated exit rules and strategy-wide overrides
//! - [`simulation`]: Replaying a strategy over a price history
//! - [`position`]: Historical positions the simulations are seeded from
//! - [`comparison`]: Ranking strategies against each other and the real trade

pub mod comparison;
pub mod exit_strategy;
pub mod position;
pub mod shared;
pub mod simulation;
