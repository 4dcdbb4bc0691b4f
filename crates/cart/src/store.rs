//! The cart store: authoritative in-memory cart mirrored into storage.
//!
//! # Commit discipline
//!
//! Every mutation works on a cloned working copy: the live cart is never
//! touched before validation succeeds. The working copy is persisted first
//! and only then swapped into memory, so a storage failure leaves memory and
//! blob unchanged and consistent with each other.
//!
//! # Serialization
//!
//! A single `tokio::sync::Mutex` is held from the working-copy snapshot
//! through the gateway await, persistence, and commit. Concurrent mutating
//! calls queue up instead of overwriting one another's effects.

use std::sync::Arc;

use cartwheel_core::ProductId;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{CartError, Result};
use crate::inventory::InventoryGateway;
use crate::storage::{CartStorage, StorageError};
use crate::types::Cart;

/// The authoritative cart state holder.
///
/// Cheaply cloneable via `Arc`; collaborators are injected explicitly.
/// Consumers get an owned snapshot from [`cart`](Self::cart) and the three
/// mutating operations — there is no other way to change the cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    gateway: Arc<dyn InventoryGateway>,
    storage: Arc<dyn CartStorage>,
    key: String,
    cart: Mutex<Cart>,
}

impl CartStore {
    /// Open the store, reading the persisted cart blob once.
    ///
    /// An absent blob yields an empty cart. A malformed blob also yields an
    /// empty cart with a warning; the stored blob is left in place until the
    /// first successful mutation rewrites it.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob store itself cannot be read.
    pub async fn open(
        gateway: Arc<dyn InventoryGateway>,
        storage: Arc<dyn CartStorage>,
        key: impl Into<String>,
    ) -> Result<Self> {
        let key = key.into();

        let cart = match storage.load(&key).await? {
            Some(blob) => match serde_json::from_str::<Cart>(&blob) {
                Ok(cart) => cart,
                Err(err) => {
                    tracing::warn!(
                        key = %key,
                        error = %err,
                        "Persisted cart blob is malformed, starting with an empty cart"
                    );
                    Cart::new()
                }
            },
            None => Cart::new(),
        };

        tracing::debug!(key = %key, items = cart.len(), "Cart store opened");

        Ok(Self {
            inner: Arc::new(CartStoreInner {
                gateway,
                storage,
                key,
                cart: Mutex::new(cart),
            }),
        })
    }

    /// An owned snapshot of the current cart, in insertion order.
    pub async fn cart(&self) -> Cart {
        self.inner.cart.lock().await.clone()
    }

    /// Add one unit of a product to the cart.
    ///
    /// Re-queries the inventory for current stock; if the product is not in
    /// the cart yet, its display data is fetched from the catalog and a new
    /// line-item with amount 1 is appended.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockExceeded`] if the incremented amount would exceed
    ///   the available stock (the cart is unchanged)
    /// - [`CartError::Gateway`] if a stock or catalog lookup fails
    /// - [`CartError::Storage`] if persisting the new cart fails (memory is
    ///   also left unchanged)
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Cart> {
        let mut live = self.inner.cart.lock().await;
        let mut working = live.clone();

        let quote = self.inner.gateway.get_stock(product_id).await?;

        let current = working.get(product_id).map_or(0, |item| item.amount);
        let desired = current + 1;

        if desired > quote.amount {
            tracing::debug!(
                desired,
                available = quote.amount,
                "Add rejected, requested quantity exceeds stock"
            );
            return Err(CartError::StockExceeded {
                requested: desired,
                available: quote.amount,
            });
        }

        if let Some(item) = working.get_mut(product_id) {
            item.amount = desired;
        } else {
            let descriptor = self.inner.gateway.get_product(product_id).await?;
            working.push(descriptor.into_item(1));
        }

        self.commit(&mut live, working).await
    }

    /// Remove a product's line-item from the cart.
    ///
    /// No inventory lookup is involved. The relative order of the remaining
    /// items is preserved.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] if the product is not in the cart
    /// - [`CartError::Storage`] if persisting the new cart fails
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Cart> {
        let mut live = self.inner.cart.lock().await;
        let mut working = live.clone();

        let Some(index) = working.position(product_id) else {
            return Err(CartError::NotFound(product_id));
        };
        working.remove(index);

        self.commit(&mut live, working).await
    }

    /// Set a product's quantity to an absolute value.
    ///
    /// An `amount` of zero or less is silently ignored: the current cart is
    /// returned unchanged and nothing is persisted.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockExceeded`] if `amount` exceeds the available stock
    /// - [`CartError::NotFound`] if the product is not in the cart
    /// - [`CartError::Gateway`] if the stock lookup fails
    /// - [`CartError::Storage`] if persisting the new cart fails
    #[instrument(skip(self), fields(product_id = %product_id, amount))]
    pub async fn update_product_amount(&self, product_id: ProductId, amount: i64) -> Result<Cart> {
        let mut live = self.inner.cart.lock().await;

        if amount <= 0 {
            return Ok(live.clone());
        }
        // Anything above u32::MAX is necessarily above stock as well.
        let requested = u32::try_from(amount).unwrap_or(u32::MAX);

        let quote = self.inner.gateway.get_stock(product_id).await?;

        if requested > quote.amount {
            tracing::debug!(
                requested,
                available = quote.amount,
                "Update rejected, requested quantity exceeds stock"
            );
            return Err(CartError::StockExceeded {
                requested,
                available: quote.amount,
            });
        }

        let mut working = live.clone();
        match working.get_mut(product_id) {
            Some(item) => item.amount = requested,
            None => return Err(CartError::NotFound(product_id)),
        }

        self.commit(&mut live, working).await
    }

    /// Persist the working copy, then swap it in as the live cart.
    async fn commit(&self, live: &mut Cart, working: Cart) -> Result<Cart> {
        let blob = serde_json::to_string(&working).map_err(StorageError::Codec)?;
        self.inner.storage.save(&self.inner.key, &blob).await?;

        *live = working;
        Ok(live.clone())
    }
}
