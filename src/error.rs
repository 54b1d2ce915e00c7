//! Error types for the trading desk.
//!
//! One enum per concern. The desk-level [`DeskError`] is the only one
//! callers at the request boundary need to handle; it maps every failure
//! kind to a response code with [`DeskError::status_code`].

use std::path::PathBuf;

use thiserror::Error;

use crate::types::OrderStatus;

/// Errors produced while parsing a price.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The text is not a decimal number
    #[error("not a decimal number: {0:?}")]
    InvalidFormat(String),

    /// Zero or negative price
    #[error("price must be positive")]
    NotPositive,

    /// More fractional digits than the price scale allows
    #[error("price has {scale} decimal places, at most 2 allowed")]
    TooManyDecimals { scale: u32 },

    /// Does not fit the cent representation
    #[error("price out of range")]
    OutOfRange,
}

/// Errors produced while validating an order ticket or an edit payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Symbol not in the configured instrument set
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Side other than "buy" / "sell"
    #[error("unknown side: {0:?}")]
    UnknownSide(String),

    /// Required field absent or blank
    #[error("{field} is required")]
    Missing { field: &'static str },

    /// Field could not be read as a number
    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },

    /// Field must be a whole number
    #[error("{field} must be an integer")]
    NotAnInteger { field: &'static str },

    /// Field must be strictly positive
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    /// Field exceeds its configured maximum
    #[error("{field} must be at most {max}")]
    AboveMaximum { field: &'static str, max: String },

    /// Field is below its minimum
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: String },

    /// Price failed fixed-point parsing
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),
}

/// Caller-contract violations detected by the matching engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The book snapshot contains the same order id twice
    #[error("duplicate order id {0} in book snapshot")]
    DuplicateOrderId(u64),

    /// The snapshot already holds the largest representable id
    #[error("no {kind} ids left after u64::MAX")]
    IdSpaceExhausted { kind: &'static str },
}

/// Errors building or (de)serializing an order book.
#[derive(Error, Debug)]
pub enum BookError {
    /// Two orders share an id
    #[error("duplicate order id {0}")]
    DuplicateOrderId(u64),

    /// Malformed JSON snapshot
    #[error("invalid book JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the desk operations.
#[derive(Error, Debug)]
pub enum DeskError {
    /// Malformed quantity / price / symbol / side
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Unknown order id
    #[error("order {0} not found")]
    NotFound(u64),

    /// Operation not allowed in the order's current status
    #[error("order {id} is {status}, only open or partial orders can be changed")]
    Conflict { id: u64, status: OrderStatus },

    /// Edit payload carries nothing to change
    #[error("malformed edit payload: {0}")]
    MalformedEdit(String),

    /// The book violated an engine precondition
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The next snapshot could not be built
    #[error(transparent)]
    Book(#[from] BookError),
}

impl DeskError {
    /// Response code for this failure at the request boundary
    pub fn status_code(&self) -> u16 {
        match self {
            DeskError::Validation(_) | DeskError::MalformedEdit(_) => 400,
            DeskError::NotFound(_) => 404,
            DeskError::Conflict { .. } => 409,
            DeskError::Engine(_) | DeskError::Book(_) => 500,
        }
    }
}

/// Errors loading the desk configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for [`crate::config::DeskConfig`]
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Values parsed but are unusable
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(DeskError::NotFound(7).status_code(), 404);
        assert_eq!(
            DeskError::Conflict { id: 1, status: OrderStatus::Executed }.status_code(),
            409
        );
        assert_eq!(DeskError::MalformedEdit("empty".into()).status_code(), 400);
        assert_eq!(
            DeskError::from(ValidationError::UnknownSymbol("ZZZ9".into())).status_code(),
            400
        );
        assert_eq!(DeskError::from(EngineError::DuplicateOrderId(3)).status_code(), 500);
        assert_eq!(
            DeskError::from(EngineError::IdSpaceExhausted { kind: "order" }).status_code(),
            500
        );
    }

    #[test]
    fn test_conflict_message_names_status() {
        let err = DeskError::Conflict { id: 4, status: OrderStatus::Cancelled };
        assert_eq!(
            err.to_string(),
            "order 4 is cancelled, only open or partial orders can be changed"
        );
    }
}
