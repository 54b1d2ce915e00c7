//! # Tradebook
//!
//! Order matching core for a single-venue trading desk.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Order, Transaction, Price)
//! - **Engine**: Status resolution and price-time priority matching
//! - **OrderBook**: Owned snapshot of every order, JSON persisted form
//! - **Validation**: Raw tickets and edits checked against configured limits
//! - **Desk**: List, submit, get, edit and cancel over one book
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical snapshot and request give an identical result
//! 2. **No Floating Point**: Prices are fixed-point cents
//! 3. **Values In, Values Out**: The engine never mutates the snapshot it reads
//! 4. **Single Writer**: Ids are allocated by scanning the snapshot
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use tradebook::{DeskConfig, OrderDesk, OrderStatus, OrderTicket};
//!
//! let mut desk = OrderDesk::new(&DeskConfig::default());
//! desk.submit_order(&OrderTicket::new("ABC1", "sell", "30", "9"), Utc::now()).unwrap();
//!
//! let created = desk
//!     .submit_order(&OrderTicket::new("ABC1", "buy", "30", "11"), Utc::now())
//!     .unwrap();
//! assert_eq!(created.status, OrderStatus::Executed);
//! assert_eq!(created.transactions[0].price.to_string(), "9.00");
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Transaction, Price
pub mod types;

/// Order book: owned snapshot with id index
pub mod orderbook;

/// Matching engine: status resolution, priority, matching
pub mod engine;

/// Ticket and edit validation
pub mod validation;

/// Desk configuration (YAML)
pub mod config;

/// Request-facing operations
pub mod desk;

/// Error types
pub mod error;

/// Subscriber setup for binaries
pub mod logging;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::DeskConfig;
pub use desk::OrderDesk;
pub use engine::{MatchResult, MatchingEngine};
pub use error::{BookError, ConfigError, DeskError, EngineError, PriceError, ValidationError};
pub use orderbook::OrderBook;
pub use types::{NewOrderRequest, Order, OrderStatus, Price, Side, Transaction};
pub use validation::{OrderEdit, OrderTicket};
