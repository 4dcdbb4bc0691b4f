//! HTTP client for the inventory service.
//!
//! The service exposes two read endpoints:
//! - `GET {base}/stock/{id}` -> `{ "amount": <integer> }`
//! - `GET {base}/products/{id}` -> `{ "id", "title", "price", "image" }`
//!
//! Prices arrive as plain decimal numbers; the configured currency is
//! attached locally.

use async_trait::async_trait;
use cartwheel_core::{CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::{InventoryError, InventoryGateway};
use crate::config::InventoryConfig;
use crate::types::{ProductDescriptor, StockQuote};

/// Stock endpoint response body.
#[derive(Debug, Deserialize)]
struct StockPayload {
    amount: u32,
}

/// Catalog endpoint response body.
#[derive(Debug, Deserialize)]
struct ProductPayload {
    id: ProductId,
    title: String,
    price: Decimal,
    image: String,
}

/// Inventory gateway backed by the inventory service's REST API.
pub struct HttpInventoryGateway {
    client: reqwest::Client,
    base_url: String,
    currency: CurrencyCode,
}

impl HttpInventoryGateway {
    /// Create a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            currency: config.currency,
        })
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, InventoryError> {
        let url = format!("{}/{path}", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        // Body text first for better error diagnostics
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Inventory service returned non-success status"
            );
            return Err(InventoryError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::error!(
                    error = %err,
                    body = %body.chars().take(200).collect::<String>(),
                    "Failed to parse inventory response"
                );
                Err(InventoryError::Parse(err))
            }
        }
    }
}

#[async_trait]
impl InventoryGateway for HttpInventoryGateway {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_stock(&self, product_id: ProductId) -> Result<StockQuote, InventoryError> {
        let payload: StockPayload = self.get_json(&format!("stock/{product_id}")).await?;

        Ok(StockQuote {
            product_id,
            amount: payload.amount,
        })
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_product(
        &self,
        product_id: ProductId,
    ) -> Result<ProductDescriptor, InventoryError> {
        let payload: ProductPayload = self.get_json(&format!("products/{product_id}")).await?;

        Ok(ProductDescriptor {
            id: payload.id,
            title: payload.title,
            price: Price::new(payload.price, self.currency),
            image: payload.image,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let config = InventoryConfig {
            base_url: "http://localhost:3333/api/".parse().unwrap(),
            timeout: std::time::Duration::from_secs(1),
            currency: CurrencyCode::USD,
        };
        let gateway = HttpInventoryGateway::new(&config).unwrap();
        assert_eq!(gateway.base_url, "http://localhost:3333/api");
    }

    #[test]
    fn test_stock_payload_ignores_extra_fields() {
        let payload: StockPayload = serde_json::from_str(r#"{"id": 1, "amount": 3}"#).unwrap();
        assert_eq!(payload.amount, 3);
    }

    #[test]
    fn test_product_payload_decodes_numeric_price() {
        let payload: ProductPayload = serde_json::from_str(
            r#"{"id": 2, "title": "Trail Sneaker", "price": 169.9, "image": "https://cdn.example.com/2.jpg"}"#,
        )
        .unwrap();

        assert_eq!(payload.id, ProductId::new(2));
        assert_eq!(payload.price, Decimal::new(1699, 1));
    }
}
