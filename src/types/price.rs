//! Fixed-point limit prices.
//!
//! ## Overview
//!
//! Prices are stored as a `u64` count of minor units (cents). Decimal text
//! and JSON numbers are parsed through `rust_decimal::Decimal`, so a value
//! such as `10.1` never passes through binary floating point on its way in.
//!
//! ## Scale Factor
//!
//! The scale is 10^2: every price carries at most 2 fractional digits.
//! The digit limit is a parse-time rule. Nothing is rounded at runtime.
//!
//! ## Examples
//!
//! ```
//! use tradebook::types::Price;
//!
//! let price: Price = "50000.12".parse().unwrap();
//! assert_eq!(price.cents(), 5_000_012);
//! assert_eq!(price.to_string(), "50000.12");
//!
//! // Three fractional digits are rejected, not rounded
//! assert!("1.005".parse::<Price>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PriceError;

/// Minor units per whole unit: 10^2
pub const SCALE: u64 = 100;

/// Maximum fractional digits accepted when parsing
pub const DECIMAL_PLACES: u32 = 2;

// ============================================================================
// Price
// ============================================================================

/// A positive limit price in cents.
///
/// Ordering and equality are exact integer comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    /// Build a price from a count of cents
    ///
    /// ```
    /// use tradebook::types::Price;
    ///
    /// assert_eq!(Price::from_cents(950).to_string(), "9.50");
    /// ```
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Build a price from whole units
    pub const fn from_units(units: u64) -> Self {
        Self(units * SCALE)
    }

    /// Raw count of cents
    #[inline]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Parse decimal text (`"10"`, `"10.5"`, `"10.50"`)
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)
            .map_err(|_| PriceError::InvalidFormat(trimmed.to_string()))?;
        Self::from_decimal(decimal)
    }

    /// Convert a `Decimal`, enforcing positivity and the 2-digit rule
    pub fn from_decimal(d: Decimal) -> Result<Self, PriceError> {
        if d <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        let scale = d.normalize().scale();
        if scale > DECIMAL_PLACES {
            return Err(PriceError::TooManyDecimals { scale });
        }

        let scaled = d
            .checked_mul(Decimal::from(SCALE))
            .ok_or(PriceError::OutOfRange)?;
        scaled.to_u64().map(Self).ok_or(PriceError::OutOfRange)
    }

    /// Exact decimal value with two fractional digits
    pub fn to_decimal(self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), DECIMAL_PLACES)
    }

    /// Value of `quantity` units at this price
    ///
    /// Returns `None` if the product does not fit a `Decimal`.
    pub fn checked_notional(self, quantity: u64) -> Option<Decimal> {
        self.to_decimal().checked_mul(Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(d: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(d)
    }
}

// ============================================================================
// Serde
// ============================================================================
// Serialized as a decimal string ("10.50"). Deserialization accepts either
// a string or a JSON number and applies the same checks as `parse`.

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let decimal = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::from_decimal(decimal).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
