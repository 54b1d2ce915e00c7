//! Order desk: the request-facing operations over one book.
//!
//! | Operation       | Success                          | Failure                     |
//! |-----------------|----------------------------------|-----------------------------|
//! | `list_orders`   | every order, book order          |                             |
//! | `submit_order`  | created order with its fills     | 400                         |
//! | `get_order`     | the order                        | 404                         |
//! | `edit_order`    | updated order, status re-derived | 404, 400, 409               |
//! | `cancel_order`  | cancelled order, nothing pending | 404, 409                    |
//!
//! Every mutation takes `&mut self`: a desk is a single writer. Sharing one
//! across threads needs the caller's own lock around each call, since the
//! scan-based ids assume nobody else writes in between.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::DeskConfig;
use crate::engine::MatchingEngine;
use crate::error::DeskError;
use crate::orderbook::OrderBook;
use crate::types::{NewOrderRequest, Order};
use crate::validation::{OrderEdit, OrderTicket, OrderValidator};

/// Book plus the rules for changing it.
///
/// ## Example
///
/// ```
/// use chrono::Utc;
/// use tradebook::config::DeskConfig;
/// use tradebook::desk::OrderDesk;
/// use tradebook::types::OrderStatus;
/// use tradebook::validation::OrderTicket;
///
/// let mut desk = OrderDesk::new(&DeskConfig::default());
///
/// let created = desk
///     .submit_order(&OrderTicket::new("ABC1", "buy", "50", "5"), Utc::now())
///     .unwrap();
/// assert_eq!(created.id, 1);
/// assert_eq!(created.status, OrderStatus::Open);
///
/// let cancelled = desk.cancel_order(1, Utc::now()).unwrap();
/// assert_eq!(cancelled.status, OrderStatus::Cancelled);
/// assert_eq!(desk.cancel_order(1, Utc::now()).unwrap_err().status_code(), 409);
/// ```
#[derive(Debug, Clone)]
pub struct OrderDesk {
    book: OrderBook,
    engine: MatchingEngine,
    validator: OrderValidator,
}

impl OrderDesk {
    /// Desk with an empty book
    pub fn new(config: &DeskConfig) -> Self {
        Self::with_book(config, OrderBook::new())
    }

    /// Desk over an existing snapshot
    pub fn with_book(config: &DeskConfig, book: OrderBook) -> Self {
        Self {
            book,
            engine: MatchingEngine::new(),
            validator: OrderValidator::new(config),
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn into_book(self) -> OrderBook {
        self.book
    }

    /// Every order, in book order
    pub fn list_orders(&self) -> &[Order] {
        self.book.orders()
    }

    /// Look up one order
    pub fn get_order(&self, id: u64) -> Result<&Order, DeskError> {
        self.book.get(id).ok_or(DeskError::NotFound(id))
    }

    /// Validate a ticket, match it and store the resulting snapshot
    ///
    /// Returns the created order, including any immediate fills.
    pub fn submit_order(&mut self, ticket: &OrderTicket, now: DateTime<Utc>) -> Result<Order, DeskError> {
        let request = self.validator.validate_ticket(ticket).map_err(|e| {
            warn!(error = %e, symbol = %ticket.symbol, "order ticket rejected");
            e
        })?;
        self.submit_request(&request, now)
    }

    /// Match an already validated request and store the resulting snapshot
    pub fn submit_request(
        &mut self,
        request: &NewOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<Order, DeskError> {
        let result = self.engine.match_order(self.book.orders(), request, now)?;
        let created = result.created_order.clone();

        self.book = OrderBook::from_orders(result.into_book())?;
        Ok(created)
    }

    /// Change quantity and/or price of an open or partial order
    ///
    /// A new quantity keeps what is already filled and moves the rest to
    /// pending. The status is re-derived afterwards. Edits never trigger
    /// matching.
    pub fn edit_order(
        &mut self,
        id: u64,
        edit: &OrderEdit,
        now: DateTime<Utc>,
    ) -> Result<Order, DeskError> {
        let order = self.book.get_mut(id).ok_or(DeskError::NotFound(id))?;

        if !order.is_active() {
            warn!(order_id = id, status = %order.status, "edit rejected");
            return Err(DeskError::Conflict { id, status: order.status });
        }
        if edit.is_empty() {
            warn!(order_id = id, "empty edit rejected");
            return Err(DeskError::MalformedEdit("nothing to change".into()));
        }

        let filled = order.filled_quantity();
        let changes = self.validator.validate_edit(edit, filled).map_err(|e| {
            warn!(error = %e, order_id = id, "order edit rejected");
            e
        })?;

        if let Some(quantity) = changes.quantity {
            order.quantity = quantity;
            order.pending_quantity = quantity.saturating_sub(filled);
        }
        if let Some(price) = changes.price {
            order.price = price;
        }
        order.updated_at = now;
        order.refresh_status();

        info!(
            order_id = id,
            quantity = order.quantity,
            pending = order.pending_quantity,
            price = %order.price,
            status = %order.status,
            "order edited"
        );
        Ok(order.clone())
    }

    /// Parse a JSON edit payload and apply it
    ///
    /// Anything other than an object with optional `quantity` / `price`
    /// is a malformed payload.
    pub fn edit_order_json(
        &mut self,
        id: u64,
        payload: &str,
        now: DateTime<Utc>,
    ) -> Result<Order, DeskError> {
        let order = self.get_order(id)?;
        if !order.is_active() {
            warn!(order_id = id, status = %order.status, "edit rejected");
            return Err(DeskError::Conflict { id, status: order.status });
        }
        let edit: OrderEdit = serde_json::from_str(payload).map_err(|e| {
            warn!(error = %e, order_id = id, "malformed edit payload");
            DeskError::MalformedEdit(e.to_string())
        })?;
        self.edit_order(id, &edit, now)
    }

    /// Cancel an open or partial order
    ///
    /// The pending quantity drops to zero; fills already recorded stay.
    pub fn cancel_order(&mut self, id: u64, now: DateTime<Utc>) -> Result<Order, DeskError> {
        let order = self.book.get_mut(id).ok_or(DeskError::NotFound(id))?;

        if !order.is_active() {
            warn!(order_id = id, status = %order.status, "cancel rejected");
            return Err(DeskError::Conflict { id, status: order.status });
        }

        order.cancel(now);
        info!(order_id = id, "order cancelled");
        Ok(order.clone())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
