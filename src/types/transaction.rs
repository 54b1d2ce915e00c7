//! Transaction: one side's record of a fill.
//!
//! Every fill is written twice, once on the resting order and once on the
//! incoming order. Both records share `id`, `quantity`, `price` and
//! `executed_at`, and each points at the *other* order through `order_id`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Price;

/// A fill as seen from the order that holds this record.
///
/// ## Price Discovery
///
/// The fill always executes at the resting order's limit price.
///
/// ## Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tradebook::types::{Price, Transaction};
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();
/// let on_resting = Transaction::new(100, 3, 30, Price::from_units(9), at);
/// let on_incoming = on_resting.mirrored(1);
///
/// assert_eq!(on_incoming.id, on_resting.id);
/// assert_eq!(on_incoming.order_id, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction id, shared by both records of the fill
    pub id: u64,

    /// Counterparty order id
    pub order_id: u64,

    /// Matched quantity (> 0)
    pub quantity: u64,

    /// Execution price (the resting order's limit price)
    pub price: Price,

    /// When the fill happened
    pub executed_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction record
    pub fn new(
        id: u64,
        order_id: u64,
        quantity: u64,
        price: Price,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_id,
            quantity,
            price,
            executed_at,
        }
    }

    /// The counterparty's copy of this record, pointing at `holder_id`
    /// (the order holding `self`)
    pub fn mirrored(&self, holder_id: u64) -> Self {
        Self {
            order_id: holder_id,
            ..self.clone()
        }
    }

    /// Check whether `other` is the counterpart record of the same fill
    pub fn is_mirror_of(&self, other: &Transaction) -> bool {
        self.id == other.id
            && self.quantity == other.quantity
            && self.price == other.price
            && self.executed_at == other.executed_at
    }

    /// Traded value (price * quantity), `None` on overflow
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_notional(self.quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
