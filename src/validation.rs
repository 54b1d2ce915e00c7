//! Request validation.
//!
//! Raw payloads arrive with numeric fields that may be JSON numbers or
//! strings typed into a form. Strings are trimmed and a blank string counts
//! as missing. Prices accept a comma as the decimal separator (`"10,50"`
//! reads as `10.50`); quantities do not, so `"10,000"` is rejected rather
//! than read as ten.
//!
//! Symbol and side must match exactly: `"ABC1"`, `"buy"`, `"sell"`.
//! Tickets and edits only deserialize from a map.
//!
//! ## Example
//!
//! ```
//! use tradebook::config::DeskConfig;
//! use tradebook::types::{Price, Side};
//! use tradebook::validation::{OrderTicket, OrderValidator};
//!
//! let validator = OrderValidator::new(&DeskConfig::default());
//! let ticket = OrderTicket::new("ABC1", "buy", "60", "11,00");
//!
//! let request = validator.validate_ticket(&ticket).unwrap();
//! assert_eq!(request.side, Side::Buy);
//! assert_eq!(request.price, Price::from_units(11));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{DeskConfig, Limits};
use crate::error::ValidationError;
use crate::types::{NewOrderRequest, Price, Side};

// ============================================================================
// Raw inputs
// ============================================================================

/// A numeric field as received: a JSON number or free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl From<u64> for NumericInput {
    fn from(value: u64) -> Self {
        NumericInput::Number(value.into())
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(value: String) -> Self {
        NumericInput::Text(value)
    }
}

/// Deserializes `T` from a map and nothing else
///
/// Derived struct impls also accept a sequence and read it positionally,
/// which would turn `[1, 2]` into a valid edit.
struct MapOnly<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for MapOnly<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<T, A::Error> {
        T::deserialize(MapAccessDeserializer::new(map))
    }
}

/// An order placement as submitted, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderTicket {
    pub symbol: String,
    pub side: String,
    pub quantity: Option<NumericInput>,
    pub price: Option<NumericInput>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct TicketFields {
    symbol: String,
    side: String,
    quantity: Option<NumericInput>,
    price: Option<NumericInput>,
}

impl<'de> Deserialize<'de> for OrderTicket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = deserializer.deserialize_map(MapOnly::<TicketFields>(PhantomData))?;
        Ok(Self {
            symbol: fields.symbol,
            side: fields.side,
            quantity: fields.quantity,
            price: fields.price,
        })
    }
}

impl OrderTicket {
    pub fn new(
        symbol: impl Into<String>,
        side: impl Into<String>,
        quantity: impl Into<NumericInput>,
        price: impl Into<NumericInput>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side: side.into(),
            quantity: Some(quantity.into()),
            price: Some(price.into()),
        }
    }
}

/// A partial update of quantity and/or price, before validation
///
/// Unknown fields are rejected so that status, ids or pending quantities
/// can never be written through an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderEdit {
    pub quantity: Option<NumericInput>,
    pub price: Option<NumericInput>,
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EditFields {
    quantity: Option<NumericInput>,
    price: Option<NumericInput>,
}

impl<'de> Deserialize<'de> for OrderEdit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = deserializer.deserialize_map(MapOnly::<EditFields>(PhantomData))?;
        Ok(Self {
            quantity: fields.quantity,
            price: fields.price,
        })
    }
}

impl OrderEdit {
    pub fn quantity(quantity: impl Into<NumericInput>) -> Self {
        Self {
            quantity: Some(quantity.into()),
            price: None,
        }
    }

    pub fn price(price: impl Into<NumericInput>) -> Self {
        Self {
            quantity: None,
            price: Some(price.into()),
        }
    }

    /// Neither field present
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.price.is_none()
    }
}

/// A validated edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRequest {
    pub quantity: Option<u64>,
    pub price: Option<Price>,
}

// ============================================================================
// Validator
// ============================================================================

/// Validates tickets and edits against the configured instruments and limits
#[derive(Debug, Clone)]
pub struct OrderValidator {
    symbols: BTreeSet<String>,
    limits: Limits,
}

impl OrderValidator {
    pub fn new(config: &DeskConfig) -> Self {
        Self {
            symbols: config.symbols.iter().cloned().collect(),
            limits: config.limits.clone(),
        }
    }

    pub fn is_known_symbol(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    /// Turn a ticket into a [`NewOrderRequest`]
    ///
    /// Checks, in order: symbol, side, quantity, price.
    pub fn validate_ticket(&self, ticket: &OrderTicket) -> Result<NewOrderRequest, ValidationError> {
        let symbol = ticket.symbol.as_str();
        if symbol.trim().is_empty() {
            return Err(ValidationError::Missing { field: "symbol" });
        }
        if !self.is_known_symbol(symbol) {
            return Err(ValidationError::UnknownSymbol(symbol.to_string()));
        }

        let side = parse_side(&ticket.side)?;
        let quantity = self.check_quantity(ticket.quantity.as_ref(), 1)?;
        let price = self.check_price(ticket.price.as_ref())?;

        Ok(NewOrderRequest::new(symbol, side, price, quantity))
    }

    /// Validate an edit of an order that has `filled` units executed
    ///
    /// A new quantity may not drop below what is already filled.
    pub fn validate_edit(&self, edit: &OrderEdit, filled: u64) -> Result<EditRequest, ValidationError> {
        let quantity = match &edit.quantity {
            Some(input) => Some(self.check_quantity(Some(input), filled.max(1))?),
            None => None,
        };
        let price = match &edit.price {
            Some(input) => Some(self.check_price(Some(input))?),
            None => None,
        };
        Ok(EditRequest { quantity, price })
    }

    fn check_quantity(&self, input: Option<&NumericInput>, min: u64) -> Result<u64, ValidationError> {
        const FIELD: &str = "quantity";

        let value = read_decimal(FIELD, input, false)?;
        if !value.fract().is_zero() {
            return Err(ValidationError::NotAnInteger { field: FIELD });
        }
        if value <= Decimal::ZERO {
            return Err(ValidationError::NotPositive { field: FIELD });
        }
        if value < Decimal::from(min) {
            return Err(ValidationError::BelowMinimum {
                field: FIELD,
                min: min.to_string(),
            });
        }
        if value > Decimal::from(self.limits.max_quantity) {
            return Err(ValidationError::AboveMaximum {
                field: FIELD,
                max: self.limits.max_quantity.to_string(),
            });
        }
        value.to_u64().ok_or(ValidationError::AboveMaximum {
            field: FIELD,
            max: self.limits.max_quantity.to_string(),
        })
    }

    fn check_price(&self, input: Option<&NumericInput>) -> Result<Price, ValidationError> {
        const FIELD: &str = "price";

        let value = read_decimal(FIELD, input, true)?;
        if value <= Decimal::ZERO {
            return Err(ValidationError::NotPositive { field: FIELD });
        }
        if value > self.limits.max_price.to_decimal() {
            return Err(ValidationError::AboveMaximum {
                field: FIELD,
                max: self.limits.max_price.to_string(),
            });
        }
        Ok(Price::from_decimal(value)?)
    }
}

fn parse_side(raw: &str) -> Result<Side, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Missing { field: "side" });
    }
    Side::parse(raw).ok_or_else(|| ValidationError::UnknownSide(raw.to_string()))
}

/// Read a numeric field; `decimal_comma` allows `,` in place of `.`
fn read_decimal(
    field: &'static str,
    input: Option<&NumericInput>,
    decimal_comma: bool,
) -> Result<Decimal, ValidationError> {
    let not_a_number = |value: String| ValidationError::NotANumber { field, value };

    match input {
        None => Err(ValidationError::Missing { field }),
        Some(NumericInput::Number(n)) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| not_a_number(text))
        }
        Some(NumericInput::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::Missing { field });
            }
            let normalized = if decimal_comma {
                trimmed.replace(',', ".")
            } else {
                trimmed.to_string()
            };
            Decimal::from_str(&normalized).map_err(|_| not_a_number(trimmed.to_string()))
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
