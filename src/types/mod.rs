//! Core data types for the trading desk
//!
//! ## Types
//!
//! - [`Order`]: A limit order on the book
//! - [`Side`]: Buy or Sell
//! - [`OrderStatus`]: Open, Partial, Executed or Cancelled
//! - [`NewOrderRequest`]: A validated order placement
//! - [`Transaction`]: One side's record of a fill
//! - [`Price`]: Fixed-point limit price in cents
//!
//! ## Fixed-Point Arithmetic
//!
//! Prices are stored as `u64` cents. Example: 50000.12 is stored as 5_000_012.

mod order;
mod transaction;
pub mod price;

// Re-export all types at module level
pub use order::{NewOrderRequest, Order, OrderStatus, Side};
pub use price::Price;
pub use transaction::Transaction;
