//! Tagged outcomes for cart operations.
//!
//! Every mutating operation on the store returns `Result<Cart, CartError>`;
//! nothing is swallowed or re-thrown past the store boundary. The variants
//! are the taxonomy callers can branch on; user-facing text lives in
//! [`crate::notice`], not here.

use cartwheel_core::ProductId;
use thiserror::Error;

use crate::inventory::InventoryError;
use crate::storage::StorageError;

/// Why a cart operation did not commit.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity exceeds the available stock. A rejected
    /// intent, not a fault: the cart is unchanged.
    #[error("requested {requested} of product, only {available} in stock")]
    StockExceeded {
        /// Quantity the caller asked for.
        requested: u32,
        /// Stock observed at the time of the request.
        available: u32,
    },

    /// The remove/update target is not in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// Stock or catalog lookup failed.
    #[error("inventory lookup failed: {0}")]
    Gateway(#[from] InventoryError),

    /// Reading or writing the persisted cart blob failed.
    #[error("cart persistence failed: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Whether this is a rejected intent (stock bound, missing item) rather
    /// than an infrastructure fault.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::StockExceeded { .. } | Self::NotFound(_))
    }
}

/// Result type alias for cart operations.
pub type Result<T, E = CartError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::StockExceeded {
            requested: 4,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "requested 4 of product, only 2 in stock"
        );

        let err = CartError::NotFound(ProductId::new(9));
        assert_eq!(err.to_string(), "product 9 is not in the cart");
    }

    #[test]
    fn test_rejection_classification() {
        assert!(
            CartError::StockExceeded {
                requested: 1,
                available: 0
            }
            .is_rejection()
        );
        assert!(CartError::NotFound(ProductId::new(1)).is_rejection());
        assert!(!CartError::Storage(StorageError::Backend("bad".to_string())).is_rejection());
    }
}
