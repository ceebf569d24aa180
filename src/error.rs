use thiserror::Error;

use crate::domain::UnavailableProduct;

/// Errors from the remote catalog/order API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Products unavailable in the requested quantity: {0:?}")]
    Conflict(Vec<UnavailableProduct>),
    #[error("HTTP error: {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Errors surfaced by the storefront client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorefrontError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("A checkout is already in progress")]
    CheckoutInProgress,
    #[error("Product out of stock: {0}")]
    ProductUnavailable(i64),
    #[error("Checkout rejected, unavailable products: {0:?}")]
    OutOfStock(Vec<UnavailableProduct>),
    #[error("Checkout failed: {0}")]
    CheckoutFailed(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
