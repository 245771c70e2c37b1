//! Positive line-item quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one.
    #[error("quantity must be at least 1 (got {0})")]
    BelowOne(i64),
    /// The value does not fit in a `u32`.
    #[error("quantity {0} is too large")]
    TooLarge(i64),
}

/// A quantity of at least one unit.
///
/// Zero-quantity cart lines are never stored; a persisted snapshot containing
/// one fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// One unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::BelowOne`] for values below 1 and
    /// [`QuantityError::TooLarge`] for values above `u32::MAX`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::BelowOne(value));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::TooLarge(value))
    }

    /// Get the quantity as a `u32`.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Add `other` units, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Adjust by a signed delta, never going below one.
    #[must_use]
    pub fn adjusted_by(self, delta: i64) -> Self {
        let next = i64::from(self.0).saturating_add(delta);
        Self::new(next).unwrap_or(if next < 1 { Self::ONE } else { Self(u32::MAX) })
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_rejects_zero_and_negative() {
        assert_eq!(Quantity::new(0), Err(QuantityError::BelowOne(0)));
        assert_eq!(Quantity::new(-4), Err(QuantityError::BelowOne(-4)));
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_adjusted_by_floors_at_one() {
        let qty = Quantity::new(2).unwrap();
        assert_eq!(qty.adjusted_by(-1).get(), 1);
        assert_eq!(qty.adjusted_by(-50).get(), 1);
        assert_eq!(qty.adjusted_by(i64::MIN).get(), 1);
        assert_eq!(qty.adjusted_by(5).get(), 7);
    }

    #[test]
    fn test_adjusted_by_saturates_high() {
        let qty = Quantity::new(i64::from(u32::MAX)).unwrap();
        assert_eq!(qty.adjusted_by(10).get(), u32::MAX);
    }

    #[test]
    fn test_quantity_serde_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("2").unwrap().get(), 2);
        assert_eq!(serde_json::to_string(&Quantity::ONE).unwrap(), "1");
    }
}
