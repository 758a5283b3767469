//! Line item quantity.
//!
//! A cart line always holds at least one unit. Zero and negative values are
//! rejected at construction, so a `Quantity` in hand is always valid.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantity was zero.
    #[error("quantity must be at least 1")]
    Zero,
    /// Quantity was negative.
    #[error("quantity cannot be negative (got {0})")]
    Negative(i64),
    /// Quantity does not fit the supported range.
    #[error("quantity must be at most {max}")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
    },
}

/// A positive number of units of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity from an unsigned count.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `n` is zero.
    pub const fn new(n: u32) -> Result<Self, QuantityError> {
        match NonZeroU32::new(n) {
            Some(n) => Ok(Self(n)),
            None => Err(QuantityError::Zero),
        }
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        if n < 0 {
            return Err(QuantityError::Negative(n));
        }
        let n = u32::try_from(n).map_err(|_| QuantityError::TooLarge { max: u32::MAX })?;
        Self::new(n)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.get()
    }
}
