use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::OrderItemRequest;
use super::product::Product;

/// A line in the cart.
///
/// `stock` is the product's available quantity when it was first added and is
/// never refreshed afterwards; it caps `quantity` for the rest of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    pub fn at_stock_limit(&self) -> bool {
        self.quantity >= self.stock
    }
}

/// In-memory shopping cart, at most one item per product, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, product_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Adds one unit of `product`.
    ///
    /// A new item starts at quantity 1 with the product's current stock as its
    /// ceiling. An existing item grows by one while below its recorded stock;
    /// past that the call is ignored. Zero-stock products are not rejected here.
    pub fn add_item(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.product_id == product.product_id) {
            Some(item) => {
                if item.quantity < item.stock {
                    item.quantity += 1;
                }
            }
            None => self.items.push(CartItem {
                product_id: product.product_id,
                name: product.name.clone(),
                quantity: 1,
                price: product.price,
                stock: product.quantity,
            }),
        }
    }

    /// Moves an item's quantity by `delta`.
    ///
    /// Unknown products are ignored. A result of zero or less removes the item;
    /// a result above the recorded stock leaves the item untouched.
    pub fn update_quantity(&mut self, product_id: i64, delta: i64) {
        let Some(index) = self.items.iter().position(|item| item.product_id == product_id) else {
            return;
        };

        let item = &mut self.items[index];
        let Some(new_quantity) = i64::from(item.quantity).checked_add(delta) else {
            return;
        };
        if new_quantity <= 0 {
            self.items.remove(index);
        } else if new_quantity <= i64::from(item.stock) {
            item.quantity = new_quantity as u32;
        }
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Projects the cart onto the order wire format, keeping cart order.
    pub fn order_items(&self) -> Vec<OrderItemRequest> {
        self.items
            .iter()
            .map(|item| OrderItemRequest {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect()
    }
}
