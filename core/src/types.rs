//! Domain DTOs for the catalog backend.
//!
//! # Design
//! Field names follow the backend's PascalCase wire format. These types are
//! defined independently from the mock-server crate; integration tests catch
//! schema drift between the two.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Stable backend identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A product as listed by `getProduct`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(deserialize_with = "non_negative_price")]
    pub price: Decimal,
    /// Path relative to the media origin.
    pub image_url: String,
}

fn non_negative_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let price = <Decimal as Deserialize>::deserialize(deserializer)?;
    if price < Decimal::ZERO {
        return Err(serde::de::Error::custom(format!("negative price {price}")));
    }
    Ok(price)
}

/// A cart line as listed by `getCartItems`.
///
/// Only the product reference is modeled; every other field the backend
/// sends is kept verbatim in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "ProductId")]
    pub product_id: ProductId,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Acknowledgment payload returned by `addToCart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartAck(Value);

impl CartAck {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// JavaScript truthiness of the payload: `null`, `false`, `0` and `""`
    /// are falsy, everything else (including empty objects) is truthy.
    pub fn is_truthy(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_reads_pascal_case_fields() {
        let product: Product = serde_json::from_value(json!({
            "ProductId": 7,
            "ProductName": "Desk Lamp",
            "Price": 19.99,
            "ImageUrl": "img/7.png"
        }))
        .unwrap();
        assert_eq!(product.product_id, ProductId::new(7));
        assert_eq!(product.product_name, "Desk Lamp");
        assert_eq!(product.price.to_string(), "19.99");
        assert_eq!(product.image_url, "img/7.png");
    }

    #[test]
    fn product_accepts_integer_and_string_prices() {
        let whole: Product = serde_json::from_value(json!({
            "ProductId": 1, "ProductName": "A", "Price": 20, "ImageUrl": "a.png"
        }))
        .unwrap();
        assert_eq!(whole.price, Decimal::new(20, 0));

        let text: Product = serde_json::from_value(json!({
            "ProductId": 1, "ProductName": "A", "Price": "4.50", "ImageUrl": "a.png"
        }))
        .unwrap();
        assert_eq!(text.price, Decimal::new(450, 2));
    }

    #[test]
    fn product_rejects_missing_name() {
        let result: Result<Product, _> = serde_json::from_value(json!({
            "ProductId": 1, "Price": 1, "ImageUrl": "a.png"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn product_rejects_negative_price() {
        let result: Result<Product, _> = serde_json::from_value(json!({
            "ProductId": 1, "ProductName": "A", "Price": -5, "ImageUrl": "a.png"
        }));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("negative price"));

        let free: Product = serde_json::from_value(json!({
            "ProductId": 1, "ProductName": "A", "Price": 0, "ImageUrl": "a.png"
        }))
        .unwrap();
        assert_eq!(free.price, Decimal::ZERO);
    }

    #[test]
    fn product_id_must_be_an_integer() {
        let result: Result<Product, _> = serde_json::from_value(json!({
            "ProductId": "abc", "ProductName": "A", "Price": 1, "ImageUrl": "a.png"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn cart_item_keeps_unmodeled_fields() {
        let item: CartItem = serde_json::from_value(json!({
            "CartItemId": 3,
            "ProductId": 42,
            "Quantity": 2
        }))
        .unwrap();
        assert_eq!(item.product_id, ProductId::new(42));
        assert_eq!(item.details["Quantity"], 2);
        assert_eq!(item.details["CartItemId"], 3);
        assert!(!item.details.contains_key("ProductId"));
    }

    #[test]
    fn ack_truthiness_follows_javascript() {
        assert!(CartAck::new(json!({})).is_truthy());
        assert!(CartAck::new(json!([])).is_truthy());
        assert!(CartAck::new(json!("ok")).is_truthy());
        assert!(CartAck::new(json!(1)).is_truthy());
        assert!(CartAck::new(json!(true)).is_truthy());
        assert!(!CartAck::new(json!(null)).is_truthy());
        assert!(!CartAck::new(json!(false)).is_truthy());
        assert!(!CartAck::new(json!(0)).is_truthy());
        assert!(!CartAck::new(json!(0.0)).is_truthy());
        assert!(!CartAck::new(json!("")).is_truthy());
    }
}
