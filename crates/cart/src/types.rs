//! Cart domain types.
//!
//! The persisted form of the cart is the plain JSON serialization of
//! [`Cart`]: an array of [`CartItem`] field maps, in insertion order.
//! [`StockQuote`] is transient and never persisted.

use cartwheel_core::{CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line-item in the cart.
///
/// At most one item exists per product id, and `amount` never exceeds the
/// stock count last observed for that product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identity, unique within the cart.
    pub id: ProductId,
    /// Product title for display.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Product image URI.
    pub image: String,
    /// Quantity in the cart (always >= 1).
    pub amount: u32,
}

/// Display attributes for a product not yet in the cart, as returned by the
/// inventory catalog lookup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductDescriptor {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
}

impl ProductDescriptor {
    /// Turn catalog display data into a cart line-item.
    #[must_use]
    pub fn into_item(self, amount: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            price: self.price,
            image: self.image,
            amount,
        }
    }
}

/// A point-in-time stock reading from the inventory gateway.
///
/// Never cached: the store re-fetches a quote on every mutating operation,
/// so it never trusts a stale stock figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockQuote {
    pub product_id: ProductId,
    /// Units currently available.
    pub amount: u32,
}

/// The ordered collection of line-items in a user's cart.
///
/// Insertion order is the order in which products were first added. The
/// order carries no semantics but is stable for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<CartItem>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a cart from an ordered list of items.
    #[must_use]
    pub const fn from_items(items: Vec<CartItem>) -> Self {
        Self(items)
    }

    /// The items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.0
    }

    /// Number of distinct line-items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the item for a product, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.0.iter().find(|item| item.id == id)
    }

    /// Find the position of a product's line-item, if present.
    #[must_use]
    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.0.iter().position(|item| item.id == id)
    }

    /// Mutable access to the item for a product, if present.
    pub fn get_mut(&mut self, id: ProductId) -> Option<&mut CartItem> {
        self.0.iter_mut().find(|item| item.id == id)
    }

    /// Append a new line-item at the end of the cart.
    pub fn push(&mut self, item: CartItem) {
        self.0.push(item);
    }

    /// Remove the line-item at `index`, preserving the relative order of
    /// the remaining items.
    pub fn remove(&mut self, index: usize) -> CartItem {
        self.0.remove(index)
    }

    /// Total number of units across all line-items.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.0.iter().map(|item| item.amount).sum()
    }

    /// Sum of `price * amount` over all line-items.
    ///
    /// The currency is taken from the first item; an empty cart reports
    /// zero in the default currency.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let currency = self
            .0
            .first()
            .map_or(CurrencyCode::default(), |item| item.price.currency_code);
        let amount = self
            .0
            .iter()
            .map(|item| item.price.amount * Decimal::from(item.amount))
            .sum();
        Price::new(amount, currency)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i64, title: &str, cents: i64, amount: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(cents, CurrencyCode::USD),
            image: format!("https://cdn.example.com/{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn test_cart_lookup_helpers() {
        let mut cart = Cart::from_items(vec![item(1, "Sneaker", 1999, 2), item(2, "Sandal", 999, 1)]);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().title, "Sandal");
        assert_eq!(cart.position(ProductId::new(1)), Some(0));
        assert_eq!(cart.position(ProductId::new(9)), None);

        cart.get_mut(ProductId::new(1)).unwrap().amount = 3;
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 3);
    }

    #[test]
    fn test_cart_remove_preserves_order() {
        let mut cart = Cart::from_items(vec![
            item(1, "A", 100, 1),
            item(2, "B", 200, 1),
            item(3, "C", 300, 1),
        ]);

        let index = cart.position(ProductId::new(2)).unwrap();
        cart.remove(index);

        let ids: Vec<i64> = cart.items().iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_cart_totals() {
        let cart = Cart::from_items(vec![item(1, "A", 1000, 2), item(2, "B", 250, 4)]);

        assert_eq!(cart.total_quantity(), 6);
        assert_eq!(cart.subtotal().display(), "$30.00");
    }

    #[test]
    fn test_empty_cart_subtotal_is_zero() {
        let cart = Cart::new();
        assert_eq!(cart.subtotal().display(), "$0.00");
    }

    #[test]
    fn test_cart_serde_round_trip_preserves_order() {
        let cart = Cart::from_items(vec![
            item(3, "C", 300, 1),
            item(1, "A", 100, 5),
            item(2, "B", 200, 2),
        ]);

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(back, cart);
    }

    #[test]
    fn test_cart_serializes_as_plain_array() {
        let cart = Cart::from_items(vec![item(1, "A", 100, 1)]);
        let value = serde_json::to_value(&cart).unwrap();

        assert!(value.is_array());
        assert_eq!(value[0]["title"], "A");
        assert_eq!(value[0]["amount"], 1);
    }

    #[test]
    fn test_product_descriptor_into_item() {
        let descriptor = ProductDescriptor {
            id: ProductId::new(7),
            title: "Boot".to_string(),
            price: Price::from_cents(4999, CurrencyCode::USD),
            image: "https://cdn.example.com/7.jpg".to_string(),
        };

        let item = descriptor.into_item(1);
        assert_eq!(item.id, ProductId::new(7));
        assert_eq!(item.amount, 1);
    }
}
