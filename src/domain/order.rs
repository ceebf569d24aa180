use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire-format projection of a cart item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: u32,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItemRequest>,
}

/// Order identifier as returned by the API, which may be numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderId {
    Number(i64),
    Text(String),
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderId::Number(id) => write!(f, "{}", id),
            OrderId::Text(id) => f.write_str(id),
        }
    }
}

/// Successful response of `POST /orders`. Only `id` is relied upon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub id: OrderId,
}

impl OrderReceipt {
    pub fn success_message(&self) -> String {
        format!("Order #{} created successfully!", self.id)
    }
}

/// A product the API refused to sell in the requested quantity (HTTP 409).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableProduct {
    pub product_id: i64,
    pub available: u32,
}
