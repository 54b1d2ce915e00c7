//! Counterparty selection and price-time ordering.
//!
//! - **Buy aggressor** matches sells, lowest price first
//! - **Sell aggressor** matches buys, highest price first
//! - Equal prices: earliest `created_at` first
//! - Still equal: book order (the sort is stable)

use std::cmp::Ordering;

use crate::types::{NewOrderRequest, Order, Side};

/// Check whether a resting order is an eligible counterparty
///
/// Same symbol, open or partial, opposite side, something pending, and the
/// price crosses the request's limit.
pub fn is_candidate(resting: &Order, request: &NewOrderRequest) -> bool {
    resting.symbol == request.symbol
        && resting.is_active()
        && resting.side == request.side.opposite()
        && resting.pending_quantity > 0
        && resting.crosses(request.side, request.price)
}

/// Price-time priority between two resting orders for `request`
pub fn priority(a: &Order, b: &Order, request: &NewOrderRequest) -> Ordering {
    let by_price = match request.side {
        Side::Buy => a.price.cmp(&b.price),
        Side::Sell => b.price.cmp(&a.price),
    };
    by_price.then_with(|| a.created_at.cmp(&b.created_at))
}

/// Positions in `book` of every candidate, best first
pub fn ranked_candidates(book: &[Order], request: &NewOrderRequest) -> Vec<usize> {
    let mut positions: Vec<usize> = book
        .iter()
        .enumerate()
        .filter(|(_, order)| is_candidate(order, request))
        .map(|(pos, _)| pos)
        .collect();

    positions.sort_by(|&a, &b| priority(&book[a], &book[b], request));
    positions
}
