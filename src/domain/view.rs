use rust_decimal::Decimal;

use super::cart::{Cart, CartItem};
use super::order::UnavailableProduct;
use super::product::{Page, Product};

/// Error banner state for a failed checkout.
///
/// An empty `unavailable_products` list means the failure carried no detail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutFailure {
    pub unavailable_products: Vec<UnavailableProduct>,
}

/// Everything a front end needs to render the storefront.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontView {
    pub search_term: String,
    pub current_page: u32,
    pub page_size: u32,
    pub is_loading: bool,
    pub products: Page<Product>,
    pub cart: Cart,
    pub checkout_success_message: Option<String>,
    pub checkout_error: Option<CheckoutFailure>,
    /// Set when the last catalog fetch failed.
    pub catalog_error: bool,
    pub checkout_in_flight: bool,
}

impl StorefrontView {
    pub fn new(page_size: u32) -> Self {
        Self {
            search_term: String::new(),
            current_page: 0,
            page_size,
            is_loading: true,
            products: Page::empty(0, page_size),
            cart: Cart::new(),
            checkout_success_message: None,
            checkout_error: None,
            catalog_error: false,
            checkout_in_flight: false,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products.content
    }

    pub fn total_pages(&self) -> u32 {
        self.products.total_pages
    }

    pub fn cart_total(&self) -> Decimal {
        self.cart.total()
    }

    /// 1-based page numbers for the paginator.
    pub fn pages(&self) -> Vec<u32> {
        (1..=self.total_pages()).collect()
    }

    pub fn show_pagination(&self) -> bool {
        !self.is_loading && self.total_pages() > 1
    }

    pub fn can_add(&self, product: &Product) -> bool {
        product.in_stock()
    }

    pub fn can_increment(&self, item: &CartItem) -> bool {
        !item.at_stock_limit()
    }
}
