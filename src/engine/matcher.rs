//! Price-time priority matcher.
//!
//! One incoming order is matched against a static snapshot of resting
//! orders. The snapshot is cloned first; the caller's orders are never
//! touched. The result carries every order of the snapshot (mutated where
//! filled, in the original order) plus the newly created order.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::engine::ids::IdAllocator;
use crate::engine::priority::ranked_candidates;
use crate::engine::status;
use crate::error::EngineError;
use crate::types::{NewOrderRequest, Order, Transaction};

// ============================================================================
// MatchResult
// ============================================================================

/// Outcome of matching one incoming order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Every order of the input snapshot, in input order
    pub updated_orders: Vec<Order>,

    /// The order built from the request, with its fills
    pub created_order: Order,
}

impl MatchResult {
    /// Fills from the incoming order's perspective, in execution order
    pub fn fills(&self) -> &[Transaction] {
        &self.created_order.transactions
    }

    /// Total quantity matched
    pub fn filled_quantity(&self) -> u64 {
        self.created_order.filled_quantity()
    }

    /// Whether nothing of the incoming order is left pending
    pub fn is_fully_filled(&self) -> bool {
        self.created_order.is_filled()
    }

    /// Σ price × quantity over all fills
    pub fn traded_notional(&self) -> Decimal {
        self.fills()
            .iter()
            .filter_map(Transaction::notional)
            .fold(Decimal::ZERO, |acc, n| acc.saturating_add(n))
    }

    /// The next book snapshot: updated orders followed by the created order
    pub fn into_book(self) -> Vec<Order> {
        let mut book = self.updated_orders;
        book.push(self.created_order);
        book
    }
}

// ============================================================================
// MatchingEngine
// ============================================================================

/// Deterministic matching engine.
///
/// Stateless: identical inputs always give identical results.
///
/// ## Example
///
/// ```
/// use chrono::Utc;
/// use tradebook::engine::MatchingEngine;
/// use tradebook::types::{NewOrderRequest, Order, OrderStatus, Price, Side};
///
/// let now = Utc::now();
/// let book = vec![Order::new(1, "ABC1", Side::Sell, Price::from_units(9), 30, now)];
/// let request = NewOrderRequest::new("ABC1", Side::Buy, Price::from_units(11), 30);
///
/// let result = MatchingEngine::new().match_order(&book, &request, now).unwrap();
///
/// assert!(result.is_fully_filled());
/// assert_eq!(result.fills()[0].price, Price::from_units(9));
/// assert_eq!(result.updated_orders[0].status, OrderStatus::Executed);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingEngine;

impl MatchingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Match `request` against `book` at time `now`
    ///
    /// 1. Clone the snapshot and allocate ids
    /// 2. Rank eligible counterparties by price, then `created_at`
    /// 3. Fill each at its own limit price until the request is exhausted
    /// 4. Build the created order from whatever is left
    ///
    /// # Errors
    ///
    /// - [`EngineError::DuplicateOrderId`] if two orders in `book` share an id
    /// - [`EngineError::IdSpaceExhausted`] if no order or transaction id is left
    pub fn match_order(
        &self,
        book: &[Order],
        request: &NewOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<MatchResult, EngineError> {
        ensure_unique_ids(book)?;

        let mut updated_orders = book.to_vec();
        let mut ids = IdAllocator::scan(book)?;
        let order_id = ids.order_id();

        let mut remaining = request.quantity;
        let mut fills = Vec::new();

        for pos in ranked_candidates(&updated_orders, request) {
            if remaining == 0 {
                break;
            }

            let resting = &mut updated_orders[pos];
            let fill_qty = resting.pending_quantity.min(remaining);
            let transaction =
                Transaction::new(ids.next_transaction_id()?, order_id, fill_qty, resting.price, now);

            debug!(
                transaction_id = transaction.id,
                resting_id = resting.id,
                quantity = fill_qty,
                price = %transaction.price,
                "fill"
            );

            fills.push(transaction.mirrored(resting.id));
            resting.record_fill(transaction);
            remaining -= fill_qty;
        }

        let created_order = Order {
            id: order_id,
            symbol: request.symbol.clone(),
            quantity: request.quantity,
            pending_quantity: remaining,
            price: request.price,
            side: request.side,
            status: status::resolve(request.quantity, remaining),
            created_at: now,
            updated_at: now,
            transactions: fills,
        };

        info!(
            order_id,
            symbol = %request.symbol,
            side = %request.side,
            price = %request.price,
            quantity = request.quantity,
            fills = created_order.transactions.len(),
            remaining,
            "order matched"
        );

        Ok(MatchResult {
            updated_orders,
            created_order,
        })
    }
}

/// Match with a default engine
pub fn match_orders(
    book: &[Order],
    request: &NewOrderRequest,
    now: DateTime<Utc>,
) -> Result<MatchResult, EngineError> {
    MatchingEngine::new().match_order(book, request, now)
}

fn ensure_unique_ids(book: &[Order]) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(book.len());
    for order in book {
        if !seen.insert(order.id) {
            return Err(EngineError::DuplicateOrderId(order.id));
        }
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderStatus, Price, Side};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap()
    }

    fn resting(id: u64, side: Side, units: u64, quantity: u64, minutes: i64) -> Order {
        Order::new(
            id,
            "ABC1",
            side,
            Price::from_units(units),
            quantity,
            t0() + Duration::minutes(minutes),
        )
    }

    fn request(side: Side, units: u64, quantity: u64) -> NewOrderRequest {
        NewOrderRequest::new("ABC1", side, Price::from_units(units), quantity)
    }

    #[test]
    fn test_empty_book_creates_open_order() {
        let result = match_orders(&[], &request(Side::Buy, 5, 50), now()).unwrap();

        assert!(result.updated_orders.is_empty());
        let created = &result.created_order;
        assert_eq!(created.id, 1);
        assert_eq!(created.pending_quantity, 50);
        assert_eq!(created.status, OrderStatus::Open);
        assert!(created.transactions.is_empty());
        assert_eq!(created.created_at, now());
        assert_eq!(created.updated_at, now());
    }

    #[test]
    fn test_no_cross_leaves_book_unchanged() {
        let book = vec![resting(1, Side::Sell, 10, 100, 0)];
        let result = match_orders(&book, &request(Side::Buy, 5, 50), now()).unwrap();

        assert_eq!(result.updated_orders, book);
        assert_eq!(result.created_order.id, 2);
        assert_eq!(result.created_order.pending_quantity, 50);
        assert_eq!(result.created_order.status, OrderStatus::Open);
        assert_eq!(result.filled_quantity(), 0);
    }

    #[test]
    fn test_walks_two_price_levels() {
        let book = vec![
            resting(1, Side::Sell, 9, 30, 0),
            resting(2, Side::Sell, 10, 50, 5),
        ];
        let result = match_orders(&book, &request(Side::Buy, 11, 60), now()).unwrap();

        let created = &result.created_order;
        assert_eq!(created.id, 3);
        assert_eq!(created.pending_quantity, 0);
        assert_eq!(created.status, OrderStatus::Executed);
        assert!(result.is_fully_filled());

        let fills = result.fills();
        assert_eq!(fills.len(), 2);
        assert_eq!((fills[0].order_id, fills[0].quantity), (1, 30));
        assert_eq!(fills[0].price, Price::from_units(9));
        assert_eq!((fills[1].order_id, fills[1].quantity), (2, 30));
        assert_eq!(fills[1].price, Price::from_units(10));
        assert_eq!(fills[0].id, 100);
        assert_eq!(fills[1].id, 101);

        let o1 = &result.updated_orders[0];
        assert_eq!(o1.pending_quantity, 0);
        assert_eq!(o1.status, OrderStatus::Executed);
        assert_eq!(o1.transactions[0].order_id, 3);
        assert_eq!(o1.updated_at, now());

        let o2 = &result.updated_orders[1];
        assert_eq!(o2.pending_quantity, 20);
        assert_eq!(o2.status, OrderStatus::Partial);
        assert_eq!(o2.transactions[0].quantity, 30);

        assert_eq!(result.traded_notional(), Decimal::new(570, 0));
    }

    #[test]
    fn test_sell_aggressor_trades_at_resting_bid() {
        let book = vec![resting(1, Side::Buy, 12, 10, 0)];
        let result = match_orders(&book, &request(Side::Sell, 10, 10), now()).unwrap();

        assert_eq!(result.fills()[0].price, Price::from_units(12));
        assert_eq!(result.updated_orders[0].transactions[0].price, Price::from_units(12));
    }

    #[test]
    fn test_partial_incoming_rests_remainder() {
        let book = vec![resting(1, Side::Buy, 10, 15, 0)];
        let result = match_orders(&book, &request(Side::Sell, 10, 40), now()).unwrap();

        assert_eq!(result.created_order.pending_quantity, 25);
        assert_eq!(result.created_order.status, OrderStatus::Partial);
        assert_eq!(result.updated_orders[0].status, OrderStatus::Executed);
    }

    #[test]
    fn test_input_snapshot_untouched() {
        let book = vec![resting(1, Side::Sell, 9, 30, 0)];
        let before = book.clone();
        let _ = match_orders(&book, &request(Side::Buy, 9, 10), now()).unwrap();
        assert_eq!(book, before);
    }

    #[test]
    fn test_unmatched_orders_pass_through_in_order() {
        let mut other_symbol = resting(2, Side::Sell, 1, 10, 0);
        other_symbol.symbol = "XYZ1".to_string();
        let book = vec![
            resting(3, Side::Buy, 8, 10, 0),
            other_symbol.clone(),
            resting(1, Side::Sell, 9, 10, 0),
        ];
        let result = match_orders(&book, &request(Side::Buy, 9, 5), now()).unwrap();

        let ids: Vec<u64> = result.updated_orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(result.updated_orders[0], book[0]);
        assert_eq!(result.updated_orders[1], other_symbol);
        assert_eq!(result.updated_orders[2].pending_quantity, 5);
    }

    #[test]
    fn test_self_trade_is_not_prevented() {
        // no owner concept: any opposite order crosses
        let book = vec![resting(1, Side::Buy, 10, 10, 0)];
        let result = match_orders(&book, &request(Side::Sell, 10, 10), now()).unwrap();
        assert!(result.is_fully_filled());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let book = vec![resting(1, Side::Sell, 9, 10, 0), resting(1, Side::Sell, 9, 10, 1)];
        let err = match_orders(&book, &request(Side::Buy, 9, 5), now()).unwrap_err();
        assert_eq!(err, EngineError::DuplicateOrderId(1));
    }

    #[test]
    fn test_exhausted_ids_fail_without_wrapping() {
        let book = vec![resting(u64::MAX, Side::Sell, 9, 10, 0)];
        let err = match_orders(&book, &request(Side::Buy, 9, 5), now()).unwrap_err();
        assert_eq!(err, EngineError::IdSpaceExhausted { kind: "order" });

        // the last transaction id can be used once, then the fill loop stops
        let mut a = resting(1, Side::Sell, 9, 10, 0);
        a.record_fill(Transaction::new(u64::MAX - 1, 7, 1, a.price, now()));
        let b = resting(2, Side::Sell, 9, 10, 1);
        let book = vec![a, b];

        let ok = match_orders(&book, &request(Side::Buy, 9, 9), now()).unwrap();
        assert_eq!(ok.fills()[0].id, u64::MAX);

        let err = match_orders(&book, &request(Side::Buy, 9, 15), now()).unwrap_err();
        assert_eq!(err, EngineError::IdSpaceExhausted { kind: "transaction" });
    }

    #[test]
    fn test_into_book_appends_created_order() {
        let book = vec![resting(1, Side::Sell, 9, 10, 0)];
        let book = match_orders(&book, &request(Side::Buy, 9, 4), now())
            .unwrap()
            .into_book();

        assert_eq!(book.len(), 2);
        assert_eq!(book[1].id, 2);

        // second aggressor continues ids and fills the partial remainder
        let result = match_orders(&book, &request(Side::Buy, 9, 6), now()).unwrap();
        assert_eq!(result.created_order.id, 3);
        assert_eq!(result.fills()[0].id, 101);
        assert_eq!(result.updated_orders[0].status, OrderStatus::Executed);
        assert_eq!(result.updated_orders[0].transactions.len(), 2);
    }
}
