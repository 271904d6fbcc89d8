// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::cast_possible_wrap,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Exit Simulator - Rust Core Library
//!
//! Deterministic exit-strategy simulation for the Cream trading system.
//! Given a position's entry and its price history, replays a rule-based exit
//! strategy (take-profit ladders, stop-loss, trailing stops, time-based and
//! stagnation exits) and reports what the strategy would have returned.
//!
//! # Architecture
//!
//! - **Domain**: Pure, synchronous simulation logic
//!   - `exit_strategy`: Exit rules, overrides, validated strategies
//!   - `simulation`: Position tracker, rule evaluator, driver, aggregator
//!   - `position`: Historical positions
//!   - `comparison`: Ranking strategies against each other and the real trade
//!
//! - **Application**: Use cases and ports
//!   - `ports`: `PriceHistoryPort`, `StrategyCatalogPort`, `PositionRepositoryPort`
//!   - `use_cases`: `SimulatePosition`, `CompareStrategies`, `AnalyzeBatch`
//!
//! - **Batch**: Rayon fan-out over positions with a TTL report cache
//!
//! - **Infrastructure**: JSON dataset loader
//!
//! # Example
//!
//! ```
//! use exit_simulator::domain::exit_strategy::{ExitRule, ExitStrategy};
//! use exit_simulator::domain::shared::Timestamp;
//! use exit_simulator::domain::simulation::{PositionEntry, PricePoint, SimulationDriver};
//! use rust_decimal_macros::dec;
//!
//! let strategy = ExitStrategy::builder("ladder", "Ladder")
//!     .rule(ExitRule::take_profit(dec!(100), dec!(50), 1))
//!     .rule(ExitRule::take_profit(dec!(200), dec!(50), 2))
//!     .build()
//!     .unwrap();
//! let entry = PositionEntry::new(dec!(1), Timestamp::parse("2026-01-01T00:00:00Z").unwrap(), dec!(100));
//! let history = vec![
//!     PricePoint::new(Timestamp::parse("2026-01-01T01:00:00Z").unwrap(), dec!(2)),
//!     PricePoint::new(Timestamp::parse("2026-01-01T02:00:00Z").unwrap(), dec!(3)),
//! ];
//!
//! let result = SimulationDriver::new().simulate(&strategy, &entry, &history).unwrap();
//! assert_eq!(result.final_pnl_pct, dec!(150));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core simulation logic with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - File-backed adapters.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Batch analysis over many positions.
pub mod batch;

/// Configuration loading and validation.
pub mod config;

/// Logging and metrics.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::comparison::{Comparator, StrategyComparison};
pub use domain::exit_strategy::{ExitRule, ExitStrategy, RuleKind, StrategyError};
pub use domain::position::PositionRecord;
pub use domain::shared::{PositionId, StrategyId, Timestamp, TokenId};
pub use domain::simulation::{
    ExitEvent, PositionEntry, PricePoint, SameTickPolicy, SimulationConfig, SimulationDriver,
    SimulationError, SimulationOutcome, SimulationResult,
};

pub use application::ports::{
    InMemoryPositionRepository, InMemoryPriceHistory, InMemoryStrategyCatalog, PortError,
    PositionRepositoryPort, PriceHistoryPort, StrategyCatalogPort,
};
pub use application::use_cases::{
    AnalyzeBatchUseCase, BatchRequest, CompareStrategiesUseCase, SimulatePositionUseCase,
};
pub use application::AnalysisError;
pub use batch::{BatchConfig, BatchExecutor, BatchReport, ReportCache};
