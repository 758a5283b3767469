//! Cart error type.
//!
//! Every failure a store operation can hit is local and recoverable: the
//! store keeps its previous state and remains usable.

use coffee_delivery_core::ProductId;
use thiserror::Error;

use crate::persistence::PersistenceError;

/// Errors returned by [`CartStore`](crate::CartStore) operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product already has a line item; its quantity must be edited instead.
    #[error("Product already in cart: {id}")]
    DuplicateProduct { id: ProductId, name: String },

    /// The write-through to storage failed; the cart was not changed.
    #[error("Failed to persist cart: {0}")]
    Persistence(#[from] PersistenceError),
}

impl CartError {
    /// Message to show the shopper, for errors they should see.
    ///
    /// Storage failures return a generic message; the details go to the log.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::DuplicateProduct { name, .. } => format!(
                "{name} is already in your cart. Open the cart and update the quantity there."
            ),
            Self::Persistence(_) => {
                "Your cart could not be saved. Please try again.".to_string()
            }
        }
    }

    /// Whether this is the duplicate-add rejection.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateProduct { .. })
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::StorageError;

    #[test]
    fn test_duplicate_display_and_notice() {
        let err = CartError::DuplicateProduct {
            id: ProductId::parse("a1").unwrap(),
            name: "Expresso".to_string(),
        };
        assert_eq!(err.to_string(), "Product already in cart: a1");
        assert!(err.notice().starts_with("Expresso is already in your cart"));
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_persistence_notice_hides_details() {
        let err = CartError::from(PersistenceError::Storage(StorageError::QuotaExceeded {
            limit: 10,
            required: 20,
        }));
        assert!(!err.is_duplicate());
        assert!(!err.notice().contains("quota"));
        assert!(err.to_string().contains("quota"));
    }
}
