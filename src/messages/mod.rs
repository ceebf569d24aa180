use tokio::sync::oneshot;

use crate::domain::{OrderReceipt, Page, Product, StorefrontView};
use crate::error::{ApiError, StorefrontError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Messages handled by the storefront actor.
///
/// The first group comes from [`StorefrontClient`](crate::clients::StorefrontClient);
/// `ProductsLoaded` and `CheckoutCompleted` are posted back by the fetcher and
/// by checkout tasks the actor spawned itself.
#[derive(Debug)]
pub enum StorefrontRequest {
    SetSearchTerm {
        term: String,
        respond_to: ServiceResponse<(), StorefrontError>,
    },
    GoToPage {
        page: u32,
        respond_to: ServiceResponse<(), StorefrontError>,
    },
    AddToCart {
        product: Product,
        respond_to: ServiceResponse<(), StorefrontError>,
    },
    UpdateQuantity {
        product_id: i64,
        delta: i64,
        respond_to: ServiceResponse<(), StorefrontError>,
    },
    Checkout {
        respond_to: ServiceResponse<OrderReceipt, StorefrontError>,
    },
    Snapshot {
        respond_to: ServiceResponse<StorefrontView, StorefrontError>,
    },
    ProductsLoaded {
        generation: u64,
        result: Result<Page<Product>, ApiError>,
    },
    CheckoutCompleted {
        result: Result<OrderReceipt, ApiError>,
        respond_to: ServiceResponse<OrderReceipt, StorefrontError>,
    },
    Shutdown,
}
