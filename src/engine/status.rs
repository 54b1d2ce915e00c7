//! Status derivation.
//!
//! An order's status is a pure function of `(quantity, pending_quantity)`.
//! `Cancelled` is never produced here; the cancel operation sets it
//! directly and nothing re-derives it afterwards.

use tracing::warn;

use crate::types::OrderStatus;

/// Derive the lifecycle status from the quantity fields
///
/// | pending                   | status     |
/// |---------------------------|------------|
/// | `== quantity`             | `Open`     |
/// | `== 0`                    | `Executed` |
/// | `0 < pending < quantity`  | `Partial`  |
///
/// `pending > quantity` is a caller bug. It falls back to `Open` and is
/// logged at `warn`.
///
/// ```
/// use tradebook::engine::status::resolve;
/// use tradebook::types::OrderStatus;
///
/// assert_eq!(resolve(100, 100), OrderStatus::Open);
/// assert_eq!(resolve(200, 50), OrderStatus::Partial);
/// assert_eq!(resolve(50, 0), OrderStatus::Executed);
/// ```
pub fn resolve(quantity: u64, pending_quantity: u64) -> OrderStatus {
    if pending_quantity == quantity {
        OrderStatus::Open
    } else if pending_quantity == 0 {
        OrderStatus::Executed
    } else if pending_quantity < quantity {
        OrderStatus::Partial
    } else {
        warn!(quantity, pending_quantity, "pending quantity exceeds quantity");
        OrderStatus::Open
    }
}
