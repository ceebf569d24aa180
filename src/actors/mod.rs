//! The storefront actor and its catalog fetch pipeline.

pub mod catalog_fetcher;
pub mod storefront_service;

pub use catalog_fetcher::{CatalogFetcher, Trigger};
pub use storefront_service::StorefrontService;
