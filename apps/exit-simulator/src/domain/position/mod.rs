//! Position Bounded Context
//!
//! Historical positions as supplied by the position repository.

mod position_record;

pub use position_record::PositionRecord;
