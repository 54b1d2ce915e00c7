//! Scan-based id allocation.
//!
//! Ids are derived from the snapshot itself: the next order id is one past
//! the largest order id, and transaction ids continue from the largest
//! transaction id anywhere in the book (starting at 100 for an empty log).
//!
//! This is only correct under a single writer. Two calls against the same
//! stale snapshot mint the same ids.
//!
//! Ids never wrap: a snapshot already holding `u64::MAX` fails with
//! [`EngineError::IdSpaceExhausted`].

use crate::error::EngineError;
use crate::types::Order;

/// First transaction id handed out when the book holds no transactions
pub const FIRST_TRANSACTION_ID: u64 = 100;

/// Ids for one match call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    order_id: u64,

    /// `None` once `u64::MAX` has been handed out
    next_transaction_id: Option<u64>,
}

impl IdAllocator {
    /// Scan a snapshot for the largest order and transaction ids
    ///
    /// ```
    /// use tradebook::engine::IdAllocator;
    ///
    /// let ids = IdAllocator::scan(&[]).unwrap();
    /// assert_eq!(ids.order_id(), 1);
    /// assert_eq!(ids.peek_transaction_id(), Some(100));
    /// ```
    ///
    /// # Errors
    ///
    /// [`EngineError::IdSpaceExhausted`] if the largest order id is `u64::MAX`.
    pub fn scan(book: &[Order]) -> Result<Self, EngineError> {
        let max_order_id = book.iter().map(|o| o.id).max().unwrap_or(0);
        let max_transaction_id = book
            .iter()
            .flat_map(|o| o.transactions.iter().map(|t| t.id))
            .max();

        let order_id = max_order_id
            .checked_add(1)
            .ok_or(EngineError::IdSpaceExhausted { kind: "order" })?;
        let next_transaction_id = match max_transaction_id {
            Some(id) => id.checked_add(1),
            None => Some(FIRST_TRANSACTION_ID),
        };

        Ok(Self {
            order_id,
            next_transaction_id,
        })
    }

    /// Id for the order being created
    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order_id
    }

    /// Get the next transaction id and increment the counter
    #[inline]
    pub fn next_transaction_id(&mut self) -> Result<u64, EngineError> {
        let id = self
            .next_transaction_id
            .ok_or(EngineError::IdSpaceExhausted { kind: "transaction" })?;
        self.next_transaction_id = id.checked_add(1);
        Ok(id)
    }

    /// Get the next transaction id (without incrementing)
    #[inline]
    pub fn peek_transaction_id(&self) -> Option<u64> {
        self.next_transaction_id
    }
}
