//! Strategy Comparison
//!
//! Ranks simulation results of several strategies on the same position and
//! measures each against what the real trade did.

mod comparator;

pub use comparator::{Comparator, RankedResult, StrategyComparison};
