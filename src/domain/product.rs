use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product as served by `GET /products`.
///
/// `quantity` is the stock available at the time of the fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl Product {
    pub fn new(product_id: i64, name: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        Self {
            product_id,
            name: name.into(),
            quantity,
            price,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// One server-paginated slice of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub number: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// The page substituted when a fetch fails or before anything was loaded.
    pub fn empty(number: u32, size: u32) -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
            total_elements: 0,
            number,
            size,
        }
    }
}
