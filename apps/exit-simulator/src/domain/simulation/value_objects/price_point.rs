//! Price observation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Timestamp;

/// One observed price of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation time.
    pub timestamp: Timestamp,
    /// Observed price in quote currency.
    pub price: Decimal,
}

impl PricePoint {
    /// Create a price point.
    #[must_use]
    pub const fn new(timestamp: Timestamp, price: Decimal) -> Self {
        Self { timestamp, price }
    }
}
