//! # Storefront
//!
//! Headless engine for a single-page shop: a searchable, paginated product
//! catalog, an in-memory cart bounded by stock, and checkout against a remote
//! order API (`GET /products`, `POST /orders`).
//!
//! ## Pieces
//!
//! - **Domain types** - wire and cart types, plus the render-ready view → [`domain`]
//! - **API seam** - the two HTTP endpoints behind a trait → [`StorefrontApi`], [`HttpStorefrontApi`]
//! - **Storefront actor** - owns all state and applies one message at a time → [`StorefrontService`]
//! - **Catalog fetcher** - debounced, latest-wins product requests → [`CatalogFetcher`]
//! - **Client** - cloneable handle with one method per user action → [`StorefrontClient`]
//! - **System coordinator** - startup and shutdown → [`StorefrontSystem`]
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! let config = StorefrontConfig::from_env()?;
//! let api = Arc::new(HttpStorefrontApi::new(&config)?);
//! let system = StorefrontSystem::new(&config, api);
//!
//! system.client.set_search_term("arroz".to_string()).await?;
//! let view = system.client.wait_until_loaded().await?;
//! system.client.add_to_cart(view.products()[0].clone()).await?;
//! let receipt = system.client.checkout().await?;
//!
//! system.shutdown().await?;
//! ```

pub mod actors;
pub mod api;
pub mod app_system;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod messages;

#[cfg(test)]
mod mock_framework;

pub use actors::{CatalogFetcher, StorefrontService, Trigger};
pub use api::{HttpStorefrontApi, ProductQuery, StorefrontApi};
pub use app_system::{setup_tracing, StorefrontSystem};
pub use clients::StorefrontClient;
pub use config::StorefrontConfig;
pub use error::{ApiError, ConfigError, StorefrontError};
