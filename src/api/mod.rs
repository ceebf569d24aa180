//! Remote product/order API.

mod http;

use async_trait::async_trait;

use crate::domain::{OrderReceipt, OrderRequest, Page, Product};
use crate::error::ApiError;

pub use self::http::HttpStorefrontApi;

/// Parameters of one catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: u32,
    pub size: u32,
    pub search: String,
}

/// The two endpoints the storefront talks to.
#[async_trait]
pub trait StorefrontApi: Send + Sync + 'static {
    async fn fetch_products(&self, query: ProductQuery) -> Result<Page<Product>, ApiError>;

    /// Places an order. A stock conflict comes back as [`ApiError::Conflict`].
    async fn submit_order(&self, order: OrderRequest) -> Result<OrderReceipt, ApiError>;
}
