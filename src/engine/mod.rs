//! Matching engine module.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Same input always produces same output
//! 2. **Fixed-Point Math**: Prices compare as integer cents
//! 3. **Synchronous Execution**: No async, no locking, no I/O
//! 4. **Price-Time Priority**: Best price first, then FIFO
//!
//! ## Matching Rules
//!
//! - **Buy orders** match sells (lowest price first)
//! - **Sell orders** match buys (highest price first)
//! - **Trade price** is always the resting order's limit price
//! - **Unfilled quantity** stays on the created order as pending
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use tradebook::engine::MatchingEngine;
//! use tradebook::types::{NewOrderRequest, OrderStatus, Price, Side};
//!
//! let engine = MatchingEngine::new();
//! let request = NewOrderRequest::new("ABC1", Side::Buy, Price::from_units(5), 50);
//!
//! let result = engine.match_order(&[], &request, Utc::now()).unwrap();
//! assert_eq!(result.created_order.id, 1);
//! assert_eq!(result.created_order.status, OrderStatus::Open);
//! ```

pub mod ids;
pub mod matcher;
pub mod priority;
pub mod status;

pub use ids::IdAllocator;
pub use matcher::{match_orders, MatchResult, MatchingEngine};
