//! Cartwheel Cart - shopping-cart state manager.
//!
//! This crate owns an in-memory, ordered collection of cart line-items,
//! mirrors it into a persistent key-value blob store, and enforces
//! stock-bound quantity invariants by consulting an external inventory
//! service before every quantity-increasing mutation.
//!
//! # Architecture
//!
//! - [`store::CartStore`] - the authoritative state holder; all mutations
//!   go through it and are serialized by a single mutation lock
//! - [`inventory::InventoryGateway`] - read-only stock and catalog lookups,
//!   re-queried on every mutating operation (no caching)
//! - [`storage::CartStorage`] - abstract key-value blob store; the full
//!   cart is rewritten after every successful mutation
//! - [`notice::NoticeSink`] - one-way channel for user-facing messages;
//!   the UI layer translates tagged failures into notices
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cartwheel_cart::config::CartConfig;
//! use cartwheel_cart::inventory::HttpInventoryGateway;
//! use cartwheel_cart::storage::InMemoryStorage;
//! use cartwheel_cart::store::CartStore;
//! use cartwheel_core::ProductId;
//!
//! let config = CartConfig::from_env()?;
//! let gateway = Arc::new(HttpInventoryGateway::new(&config.inventory)?);
//! let storage = Arc::new(InMemoryStorage::new());
//! let store = CartStore::open(gateway, storage, config.storage_key).await?;
//!
//! let cart = store.add_product(ProductId::new(1)).await?;
//! assert_eq!(cart[0].amount, 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod inventory;
pub mod notice;
pub mod storage;
pub mod store;
pub mod types;

pub use error::{CartError, Result};
pub use store::CartStore;
pub use types::{Cart, CartItem, ProductDescriptor, StockQuote};
