//! Owned order book snapshot.
//!
//! ## Storage
//!
//! - **Vec**: orders in book order (the persisted order)
//! - **HashMap**: order id to position, for O(1) lookup
//!
//! ## Persisted Form
//!
//! One JSON array of order objects. Ids are unique across the array;
//! loading a snapshot with a repeated id fails.
//!
//! ## State Root
//!
//! [`OrderBook::state_root`] hashes every field of every order with
//! SHA-256 in book order. Identical snapshots always give identical roots,
//! which makes it a cheap way to compare two runs or detect a stale copy.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::error::BookError;
use crate::types::{Order, OrderStatus, Side};

/// The sole owner of every order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBook {
    /// Orders in book order
    orders: Vec<Order>,

    /// Order id to position in `orders`
    index: HashMap<u64, usize>,
}

impl OrderBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a snapshot
    ///
    /// # Errors
    ///
    /// [`BookError::DuplicateOrderId`] if two orders share an id.
    pub fn from_orders(orders: Vec<Order>) -> Result<Self, BookError> {
        let mut index = HashMap::with_capacity(orders.len());
        for (pos, order) in orders.iter().enumerate() {
            if index.insert(order.id, pos).is_some() {
                return Err(BookError::DuplicateOrderId(order.id));
            }
        }
        Ok(Self { orders, index })
    }

    /// Load a snapshot from its JSON array form
    ///
    /// ```
    /// use tradebook::orderbook::OrderBook;
    ///
    /// let book = OrderBook::from_json("[]").unwrap();
    /// assert!(book.is_empty());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        let orders: Vec<Order> = serde_json::from_str(json)?;
        Self::from_orders(orders)
    }

    /// Serialize to a compact JSON array
    pub fn to_json(&self) -> Result<String, BookError> {
        Ok(serde_json::to_string(&self.orders)?)
    }

    /// Serialize to an indented JSON array
    pub fn to_json_pretty(&self) -> Result<String, BookError> {
        Ok(serde_json::to_string_pretty(&self.orders)?)
    }

    // ========================================================================
    // Access
    // ========================================================================

    #[inline]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn into_orders(self) -> Vec<Order> {
        self.orders
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: u64) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up an order by id
    pub fn get(&self, id: u64) -> Option<&Order> {
        self.index.get(&id).map(|&pos| &self.orders[pos])
    }

    /// Mutable lookup; callers must not change the id
    pub(crate) fn get_mut(&mut self, id: u64) -> Option<&mut Order> {
        let pos = *self.index.get(&id)?;
        self.orders.get_mut(pos)
    }

    // ========================================================================
    // State root
    // ========================================================================

    /// SHA-256 over every order field, in book order
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.orders.len() as u64).to_le_bytes());

        for order in &self.orders {
            hasher.update(order.id.to_le_bytes());
            hasher.update((order.symbol.len() as u64).to_le_bytes());
            hasher.update(order.symbol.as_bytes());
            hasher.update(order.quantity.to_le_bytes());
            hasher.update(order.pending_quantity.to_le_bytes());
            hasher.update(order.price.cents().to_le_bytes());
            hasher.update([side_byte(order.side), status_byte(order.status)]);
            hasher.update(order.created_at.timestamp_micros().to_le_bytes());
            hasher.update(order.updated_at.timestamp_micros().to_le_bytes());

            hasher.update((order.transactions.len() as u64).to_le_bytes());
            for tx in &order.transactions {
                hasher.update(tx.id.to_le_bytes());
                hasher.update(tx.order_id.to_le_bytes());
                hasher.update(tx.quantity.to_le_bytes());
                hasher.update(tx.price.cents().to_le_bytes());
                hasher.update(tx.executed_at.timestamp_micros().to_le_bytes());
            }
        }

        let result = hasher.finalize();

        let mut root = [0u8; 32];
        root.copy_from_slice(&result);
        root
    }

    /// The state root as a hex string
    pub fn fingerprint(&self) -> String {
        hex::encode(self.state_root())
    }
}

fn side_byte(side: Side) -> u8 {
    match side {
        Side::Buy => 0,
        Side::Sell => 1,
    }
}

fn status_byte(status: OrderStatus) -> u8 {
    match status {
        OrderStatus::Open => 0,
        OrderStatus::Partial => 1,
        OrderStatus::Executed => 2,
        OrderStatus::Cancelled => 3,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
