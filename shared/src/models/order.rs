//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Catalog product reference (0 for extra dishes added at billing time)
    pub product_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: i32,
    /// Price per unit in currency unit
    #[serde(rename = "price")]
    pub unit_price: f64,
}

impl OrderLine {
    pub fn new(product_id: i64, name: impl Into<String>, quantity: i32, unit_price: f64) -> Self {
        Self {
            product_id,
            name: Some(name.into()),
            quantity,
            unit_price,
        }
    }

    /// Name shown on receipts
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Item")
    }
}

/// Order entity as returned by `GET /api/orders/{orderId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub table_number: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "items", default)]
    pub lines: Vec<OrderLine>,
    /// Discount amount in currency unit
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub points_used: Option<i64>,
}

impl Order {
    /// Discount applied to the subtotal (0 when absent)
    pub fn discount(&self) -> f64 {
        self.discount_amount.unwrap_or(0.0)
    }
}

/// The API serializes some identifiers as numbers and others as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_from_api_json() {
        let json = r#"{
            "orderId": "ORD-42",
            "tableNumber": 7,
            "createdAt": "2024-03-01T12:30:00Z",
            "paymentMethod": "UPI",
            "customerName": "Asha",
            "status": "completed",
            "items": [
                {"productId": 3, "name": "Dal Makhani", "quantity": 2, "price": 100},
                {"productId": 9, "quantity": 1, "price": 50.5}
            ],
            "discountAmount": 10
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, "ORD-42");
        assert_eq!(order.table_number, "7");
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].unit_price, 100.0);
        assert_eq!(order.lines[1].display_name(), "Item");
        assert_eq!(order.discount(), 10.0);
        assert_eq!(order.points_used, None);
    }

    #[test]
    fn test_missing_discount_defaults_to_zero() {
        let json = r#"{"orderId": 15, "createdAt": "2024-03-01T12:30:00Z"}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, "15");
        assert!(order.lines.is_empty());
        assert_eq!(order.discount(), 0.0);
    }

    #[test]
    fn test_line_serializes_price_key() {
        let line = OrderLine::new(0, "Paneer Masala", 2, 170.0);
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["productId"], 0);
        assert_eq!(value["price"], 170.0);
        assert_eq!(value["quantity"], 2);
    }
}
