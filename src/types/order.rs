//! Order types for the trading desk.
//!
//! ## JSON Shape
//!
//! Orders are persisted as camelCase JSON objects inside one array:
//!
//! ```json
//! {
//!   "id": 2, "symbol": "ABC1", "quantity": 50, "pendingQuantity": 20,
//!   "price": "10.00", "side": "sell", "status": "partial",
//!   "createdAt": "2024-01-01T10:05:00Z", "updatedAt": "2024-01-01T11:00:00Z",
//!   "transactions": [ ... ]
//! }
//! ```
//!
//! A missing `transactions` field reads as an empty list.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::status;
use crate::types::{Price, Transaction};

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Parse `"buy"` / `"sell"`, exact match only
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "buy" => Some(Side::Buy),
            "sell" => Some(Side::Sell),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// OrderStatus enum
// ============================================================================

/// Lifecycle status of an order.
///
/// `Open`, `Partial` and `Executed` are derived from quantities by
/// [`status::resolve`]. `Cancelled` is terminal and only set by a cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Nothing filled yet
    Open,
    /// Some quantity filled, some pending
    Partial,
    /// Fully filled
    Executed,
    /// Withdrawn by the owner
    Cancelled,
}

impl OrderStatus {
    /// Open or partial: can be filled, edited or cancelled
    pub fn is_active(self) -> bool {
        match self {
            OrderStatus::Open | OrderStatus::Partial => true,
            OrderStatus::Executed | OrderStatus::Cancelled => false,
        }
    }

    /// No transition leaves this status
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Partial => "partial",
            OrderStatus::Executed => "executed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// NewOrderRequest
// ============================================================================

/// A validated request to place a limit order.
///
/// Produced by [`crate::validation::OrderValidator::validate_ticket`]; the matching engine
/// trusts its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderRequest {
    pub symbol: String,
    pub side: Side,
    pub price: Price,
    pub quantity: u64,
}

impl NewOrderRequest {
    pub fn new(symbol: impl Into<String>, side: Side, price: Price, quantity: u64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            price,
            quantity,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A limit order on the book.
///
/// ## Example
///
/// ```
/// use chrono::Utc;
/// use tradebook::types::{Order, OrderStatus, Price, Side};
///
/// let order = Order::new(1, "ABC1", Side::Buy, Price::from_units(5), 50, Utc::now());
/// assert_eq!(order.pending_quantity, 50);
/// assert_eq!(order.status, OrderStatus::Open);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier (assigned by the engine)
    pub id: u64,

    /// Instrument symbol
    pub symbol: String,

    /// Original quantity
    pub quantity: u64,

    /// Unfilled remainder, `0 <= pending_quantity <= quantity`
    pub pending_quantity: u64,

    /// Limit price
    pub price: Price,

    pub side: Side,

    /// Derived from quantities except for `Cancelled`
    pub status: OrderStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Fills in execution order
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Order {
    /// Create an unfilled order
    pub fn new(
        id: u64,
        symbol: impl Into<String>,
        side: Side,
        price: Price,
        quantity: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            quantity,
            pending_quantity: quantity, // Initially nothing is filled
            price,
            side,
            status: OrderStatus::Open,
            created_at,
            updated_at: created_at,
            transactions: Vec::new(),
        }
    }

    /// Open or partial
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Check if the order is fully filled
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Executed
    }

    /// Quantity filled so far, from the quantity fields
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.pending_quantity)
    }

    /// Quantity filled so far, from the transaction log
    pub fn transacted_quantity(&self) -> u64 {
        self.transactions.iter().map(|t| t.quantity).sum()
    }

    /// Whether this order would trade against a `side` order at `price`
    ///
    /// A resting sell crosses a buy at or above its price; a resting buy
    /// crosses a sell at or below its price.
    pub fn crosses(&self, side: Side, price: Price) -> bool {
        match side {
            Side::Buy => self.price <= price,
            Side::Sell => self.price >= price,
        }
    }

    /// Record a fill against this order
    ///
    /// Decrements the pending quantity, appends the transaction, re-derives
    /// the status and stamps `updated_at` with the execution time.
    pub fn record_fill(&mut self, transaction: Transaction) {
        debug_assert!(transaction.quantity <= self.pending_quantity);

        self.pending_quantity = self.pending_quantity.saturating_sub(transaction.quantity);
        self.updated_at = transaction.executed_at;
        self.transactions.push(transaction);
        self.refresh_status();
    }

    /// Re-derive the status from the quantities
    ///
    /// A cancelled order stays cancelled.
    pub fn refresh_status(&mut self) {
        if self.status != OrderStatus::Cancelled {
            self.status = status::resolve(self.quantity, self.pending_quantity);
        }
    }

    /// Move to the terminal cancelled state
    ///
    /// Callers check [`Order::is_active`] first; this does not.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        self.status = OrderStatus::Cancelled;
        self.pending_quantity = 0;
        self.updated_at = now;
    }

    /// Check the per-order invariants
    ///
    /// - `pending_quantity <= quantity`
    /// - for non-cancelled orders: filled quantity equals the transaction
    ///   total and the status matches the resolver
    pub fn check_invariants(&self) -> bool {
        if self.pending_quantity > self.quantity {
            return false;
        }
        match self.status {
            OrderStatus::Cancelled => true,
            _ => {
                self.filled_quantity() == self.transacted_quantity()
                    && self.status == status::resolve(self.quantity, self.pending_quantity)
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
