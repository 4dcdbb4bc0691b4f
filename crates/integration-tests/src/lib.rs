//! Integration tests for Cartwheel.
//!
//! The harness wires a [`CartStore`] to in-process fakes: a scripted
//! inventory service with adjustable stock, volatile blob storage, and a
//! recording notice sink. Tests drive full operation sequences through the
//! public store interface only.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cartwheel_cart::inventory::{InventoryError, InventoryGateway};
use cartwheel_cart::notice::{Notice, NoticeSink};
use cartwheel_cart::storage::{CartStorage, InMemoryStorage};
use cartwheel_cart::store::CartStore;
use cartwheel_cart::types::{Cart, ProductDescriptor, StockQuote};
use cartwheel_core::{CurrencyCode, Price, ProductId};

/// Blob-store key used across the integration suite.
pub const STORAGE_KEY: &str = "@cartwheel:cart";

// =============================================================================
// ScriptedInventory
// =============================================================================

/// In-process inventory service with adjustable stock and an offline switch.
///
/// Catalog data is derived from the product id so assertions stay simple:
/// title `Product {id}`, price `{id},990` cents, image under a fixed CDN
/// prefix.
#[derive(Default)]
pub struct ScriptedInventory {
    stock: Mutex<HashMap<i64, u32>>,
    offline: AtomicBool,
    stock_calls: AtomicUsize,
}

impl ScriptedInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the available stock for a product.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_stock(&self, id: i64, amount: u32) {
        #[allow(clippy::unwrap_used)]
        self.stock.lock().unwrap().insert(id, amount);
    }

    /// Make every subsequent lookup fail, as if the service were down.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Restore lookups after [`go_offline`](Self::go_offline).
    pub fn go_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    /// Number of stock lookups served so far.
    #[must_use]
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    /// The catalog descriptor this inventory serves for `id`.
    #[must_use]
    pub fn descriptor(id: i64) -> ProductDescriptor {
        ProductDescriptor {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(id * 1000 + 990, CurrencyCode::USD),
            image: format!("https://cdn.example.com/products/{id}.jpg"),
        }
    }
}

#[async_trait]
impl InventoryGateway for ScriptedInventory {
    async fn get_stock(&self, product_id: ProductId) -> Result<StockQuote, InventoryError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(InventoryError::NotFound("service offline".to_string()));
        }
        let amount = {
            #[allow(clippy::unwrap_used)]
            let stock = self.stock.lock().unwrap();
            stock
                .get(&product_id.as_i64())
                .copied()
                .ok_or_else(|| InventoryError::NotFound(product_id.to_string()))?
        };
        Ok(StockQuote { product_id, amount })
    }

    async fn get_product(
        &self,
        product_id: ProductId,
    ) -> Result<ProductDescriptor, InventoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(InventoryError::NotFound("service offline".to_string()));
        }
        Ok(Self::descriptor(product_id.as_i64()))
    }
}

// =============================================================================
// RecordingSink
// =============================================================================

/// Notice sink that records everything published to it.
#[derive(Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notices published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn published(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl NoticeSink for RecordingSink {
    fn publish(&self, notice: Notice) {
        #[allow(clippy::unwrap_used)]
        self.notices.lock().unwrap().push(notice);
    }
}

// =============================================================================
// TestCart
// =============================================================================

/// A cart store wired to in-process fakes.
pub struct TestCart {
    pub store: CartStore,
    pub inventory: Arc<ScriptedInventory>,
    pub storage: Arc<InMemoryStorage>,
    pub notices: Arc<RecordingSink>,
}

impl TestCart {
    /// Open a store over empty storage.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    pub async fn new() -> Self {
        Self::over_storage(Arc::new(InMemoryStorage::new())).await
    }

    /// Open a store over storage pre-seeded with `blob` under the suite key.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    pub async fn with_blob(blob: &str) -> Self {
        Self::over_storage(Arc::new(InMemoryStorage::with_blob(STORAGE_KEY, blob))).await
    }

    async fn over_storage(storage: Arc<InMemoryStorage>) -> Self {
        let inventory = Arc::new(ScriptedInventory::new());
        #[allow(clippy::unwrap_used)]
        let store = CartStore::open(inventory.clone(), storage.clone(), STORAGE_KEY)
            .await
            .unwrap();

        Self {
            store,
            inventory,
            storage,
            notices: Arc::new(RecordingSink::new()),
        }
    }

    /// The cart currently persisted in storage, if any.
    ///
    /// # Panics
    ///
    /// Panics if storage fails or the blob is not valid JSON.
    #[allow(clippy::unwrap_used)]
    pub async fn persisted(&self) -> Option<Cart> {
        self.storage
            .load(STORAGE_KEY)
            .await
            .unwrap()
            .map(|blob| serde_json::from_str(&blob).expect("persisted blob must be valid JSON"))
    }

    /// Assert the in-memory cart and the persisted blob are equal.
    ///
    /// # Panics
    ///
    /// Panics if they diverge or nothing is persisted.
    pub async fn assert_memory_matches_blob(&self) {
        let memory = self.store.cart().await;
        let blob = self.persisted().await.expect("a blob should be persisted");
        assert_eq!(memory, blob, "in-memory cart diverged from persisted blob");
    }
}
