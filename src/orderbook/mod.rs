//! Order book module.
//!
//! ## Components
//!
//! - [`OrderBook`]: owned snapshot of every order, keyed by id, with its
//!   JSON array persisted form and a SHA-256 state root
//!
//! ## Ownership
//!
//! The book owns every [`crate::types::Order`]; each order owns its
//! transactions. The matching engine reads a borrowed slice and returns a
//! new snapshot, which replaces the old one wholesale.
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use tradebook::orderbook::OrderBook;
//! use tradebook::types::{Order, Price, Side};
//!
//! let order = Order::new(1, "ABC1", Side::Buy, Price::from_units(50), 10, Utc::now());
//! let book = OrderBook::from_orders(vec![order]).unwrap();
//!
//! assert!(book.contains(1));
//! assert_eq!(book.fingerprint().len(), 64);
//! ```

pub mod book;

pub use book::OrderBook;
