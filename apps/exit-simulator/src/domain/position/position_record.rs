//! Historical position record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{PositionId, Timestamp, TokenId};
use crate::domain::simulation::PositionEntry;

/// A position as it actually played out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Position identifier.
    pub id: PositionId,
    /// Token the position holds.
    pub token: TokenId,
    /// Entry facts used to seed simulations.
    #[serde(flatten)]
    pub entry: PositionEntry,
    /// Realized PnL of the real trade, in percent, once closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_pnl_pct: Option<Decimal>,
    /// When the real trade was closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<Timestamp>,
}

impl PositionRecord {
    /// Create an open position record.
    #[must_use]
    pub fn new(id: impl Into<PositionId>, token: impl Into<TokenId>, entry: PositionEntry) -> Self {
        Self {
            id: id.into(),
            token: token.into(),
            entry,
            actual_pnl_pct: None,
            closed_at: None,
        }
    }

    /// Mark the record closed with its realized outcome.
    #[must_use]
    pub const fn closed(mut self, closed_at: Timestamp, actual_pnl_pct: Decimal) -> Self {
        self.closed_at = Some(closed_at);
        self.actual_pnl_pct = Some(actual_pnl_pct);
        self
    }

    /// When the position was opened.
    #[must_use]
    pub const fn opened_at(&self) -> Timestamp {
        self.entry.entry_time
    }

    /// Whether the position was opened within `[from, to]`.
    #[must_use]
    pub fn opened_within(&self, from: Timestamp, to: Timestamp) -> bool {
        let opened = self.opened_at();
        opened >= from && opened <= to
    }
}
