use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

use crate::domain::{OrderReceipt, Product, StorefrontView};
use crate::error::StorefrontError;
use crate::messages::StorefrontRequest;

/// Handle to the storefront actor. Cheap to clone.
#[derive(Clone)]
pub struct StorefrontClient {
    sender: mpsc::Sender<StorefrontRequest>,
    views: watch::Receiver<StorefrontView>,
}

impl StorefrontClient {
    pub fn new(sender: mpsc::Sender<StorefrontRequest>, views: watch::Receiver<StorefrontView>) -> Self {
        Self { sender, views }
    }

    /// Stream of view snapshots, one per state change.
    pub fn subscribe(&self) -> watch::Receiver<StorefrontView> {
        self.views.clone()
    }

    /// The most recently published view.
    pub fn view(&self) -> StorefrontView {
        self.views.borrow().clone()
    }

    /// Waits until the newest product request has been answered.
    #[instrument(skip(self))]
    pub async fn wait_until_loaded(&self) -> Result<StorefrontView, StorefrontError> {
        let mut views = self.subscribe();
        let view = views
            .wait_for(|view| !view.is_loading)
            .await
            .map_err(|_| StorefrontError::ActorCommunicationError("Actor dropped".to_string()))?;
        Ok(view.clone())
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), StorefrontError> {
        debug!("Sending shutdown request");
        self.sender
            .send(StorefrontRequest::Shutdown)
            .await
            .map_err(|e| StorefrontError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(StorefrontClient => fn set_search_term(term: String) -> () as StorefrontRequest::SetSearchTerm, Error = StorefrontError);
client_method!(StorefrontClient => fn go_to_page(page: u32) -> () as StorefrontRequest::GoToPage, Error = StorefrontError);
client_method!(StorefrontClient => fn add_to_cart(product: Product) -> () as StorefrontRequest::AddToCart, Error = StorefrontError);
client_method!(StorefrontClient => fn update_quantity(product_id: i64, delta: i64) -> () as StorefrontRequest::UpdateQuantity, Error = StorefrontError);
client_method!(StorefrontClient => fn checkout() -> OrderReceipt as StorefrontRequest::Checkout, Error = StorefrontError);
client_method!(StorefrontClient => fn snapshot() -> StorefrontView as StorefrontRequest::Snapshot, Error = StorefrontError);
