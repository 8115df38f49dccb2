//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are stored as `REAL` in `SQLite`. `Price` keeps the in-memory
//! value as a [`Decimal`] and converts at the storage boundary, so arithmetic and
//! equality never go through binary floating point.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price must not be negative (got {0})")]
    Negative(Decimal),
    /// The floating point value has no decimal representation (NaN, infinity).
    #[error("price is not a finite number")]
    NotFinite,
}

/// A non-negative catalog price.
///
/// Serializes as a JSON number.
///
/// ## Examples
///
/// ```
/// use order_desk_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(250, 2)).unwrap();
/// assert_eq!(price.to_string(), "2.50");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a stored floating point value.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotFinite` for NaN or infinite input and
    /// `PriceError::Negative` for values below zero.
    pub fn from_f64(value: f64) -> Result<Self, PriceError> {
        let amount = Decimal::from_f64(value).ok_or(PriceError::NotFinite)?;
        Self::new(amount.normalize())
    }

    /// The amount as a floating point value, for binding to a `REAL` column.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        // Every Decimal is within f64 range; only precision is lost.
        self.0.to_f64().unwrap_or_default()
    }

    /// The price as it reads back after a round trip through a `REAL` column.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotFinite` only if the amount has no `f64` value.
    pub fn as_stored(self) -> Result<Self, PriceError> {
        Self::from_f64(self.to_f64())
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        let err = Price::new(Decimal::new(-5, 1)).unwrap_err();
        assert_eq!(err, PriceError::Negative(Decimal::new(-5, 1)));
    }

    #[test]
    fn test_new_accepts_zero() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap().amount(), Decimal::ZERO);
        // -0 is still zero
        assert!(Price::new(Decimal::new(-0, 2)).is_ok());
    }

    #[test]
    fn test_from_f64_keeps_short_decimals() {
        let price = Price::from_f64(0.1).unwrap();
        assert_eq!(price.amount(), Decimal::new(1, 1));

        let price = Price::from_f64(12.5).unwrap();
        assert_eq!(price.amount(), Decimal::new(125, 1));
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert_eq!(Price::from_f64(f64::NAN), Err(PriceError::NotFinite));
        assert_eq!(Price::from_f64(f64::INFINITY), Err(PriceError::NotFinite));
    }

    #[test]
    fn test_to_f64() {
        let price = Price::new(Decimal::new(399, 2)).unwrap();
        assert!((price.to_f64() - 3.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_as_stored_drops_precision_beyond_f64() {
        let precise = Price::new("1.0000000000000001".parse().unwrap()).unwrap();
        assert_eq!(precise.as_stored().unwrap().amount(), Decimal::ONE);

        let short = Price::new(Decimal::new(250, 2)).unwrap();
        assert_eq!(short.as_stored().unwrap(), short);
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::new(Decimal::new(250, 2)).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "2.5");
    }

    #[test]
    fn test_deserialize_validates() {
        let price: Price = serde_json::from_str("4.25").unwrap();
        assert_eq!(price.amount(), Decimal::new(425, 2));

        assert!(serde_json::from_str::<Price>("-1.0").is_err());
    }
}
