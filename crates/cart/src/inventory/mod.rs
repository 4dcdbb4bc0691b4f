//! Inventory gateway: read-only stock and catalog lookups.
//!
//! The cart store consults the gateway before every quantity-increasing
//! mutation and performs zero retries and zero caching — every mutating
//! call re-queries, so the store never trusts a stale stock figure. No
//! write operations exist on this interface.

mod http;

pub use http::HttpInventoryGateway;

use async_trait::async_trait;
use cartwheel_core::ProductId;
use thiserror::Error;

use crate::types::{ProductDescriptor, StockQuote};

/// Errors from the inventory service.
///
/// The cart store does not branch on these variants — any failure collapses
/// into a single gateway-failure outcome — but the taxonomy is kept for
/// logging and diagnostics.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("inventory service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No such product or stock record.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Read-only view of the inventory service.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Current available stock for a product.
    async fn get_stock(&self, product_id: ProductId) -> Result<StockQuote, InventoryError>;

    /// Display attributes for a product not yet in the cart.
    async fn get_product(&self, product_id: ProductId)
    -> Result<ProductDescriptor, InventoryError>;
}
