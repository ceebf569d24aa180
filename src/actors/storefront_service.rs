use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn, Instrument};

use super::catalog_fetcher::{CatalogFetcher, Trigger};
use crate::api::StorefrontApi;
use crate::clients::StorefrontClient;
use crate::config::StorefrontConfig;
use crate::domain::{CheckoutFailure, OrderReceipt, OrderRequest, Page, Product, StorefrontView};
use crate::error::{ApiError, StorefrontError};
use crate::messages::{ServiceResponse, StorefrontRequest};

/// Owns all storefront state: query, product page, cart and checkout status.
///
/// Every mutation happens inside `run`, one message at a time. HTTP work is
/// never awaited here; the fetcher and spawned checkout tasks post their
/// results back into the mailbox.
pub struct StorefrontService {
    receiver: mpsc::Receiver<StorefrontRequest>,
    sender: mpsc::Sender<StorefrontRequest>,
    api: Arc<dyn StorefrontApi>,
    triggers: watch::Sender<Trigger>,
    views: watch::Sender<StorefrontView>,
    state: StorefrontView,
    generation: u64,
}

impl StorefrontService {
    pub fn new(
        config: &StorefrontConfig,
        api: Arc<dyn StorefrontApi>,
    ) -> (Self, CatalogFetcher, StorefrontClient) {
        let (sender, receiver) = mpsc::channel(config.buffer_size);
        let (triggers, trigger_rx) = watch::channel(Trigger::initial());
        let state = StorefrontView::new(config.page_size);
        let (views, view_rx) = watch::channel(state.clone());

        let fetcher = CatalogFetcher::new(
            Arc::clone(&api),
            trigger_rx,
            sender.clone(),
            config.debounce,
            config.page_size,
        );
        let client = StorefrontClient::new(sender.clone(), view_rx);
        let service = Self {
            receiver,
            sender,
            api,
            triggers,
            views,
            state,
            generation: 0,
        };
        (service, fetcher, client)
    }

    #[instrument(name = "storefront_service", skip(self))]
    pub async fn run(mut self) {
        info!("StorefrontService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StorefrontRequest::SetSearchTerm { term, respond_to } => {
                    self.handle_set_search_term(term, respond_to);
                }
                StorefrontRequest::GoToPage { page, respond_to } => {
                    self.handle_go_to_page(page, respond_to);
                }
                StorefrontRequest::AddToCart { product, respond_to } => {
                    self.handle_add_to_cart(product, respond_to);
                }
                StorefrontRequest::UpdateQuantity { product_id, delta, respond_to } => {
                    self.handle_update_quantity(product_id, delta, respond_to);
                }
                StorefrontRequest::Checkout { respond_to } => {
                    self.handle_checkout(respond_to);
                }
                StorefrontRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.clone()));
                }
                StorefrontRequest::ProductsLoaded { generation, result } => {
                    self.handle_products_loaded(generation, result);
                }
                StorefrontRequest::CheckoutCompleted { result, respond_to } => {
                    self.handle_checkout_completed(result, respond_to);
                }
                StorefrontRequest::Shutdown => {
                    info!("StorefrontService shutting down");
                    break;
                }
            }
        }

        info!("StorefrontService stopped");
    }

    fn publish(&self) {
        self.views.send_replace(self.state.clone());
    }

    /// Emits the current (search, page) as a new trigger and raises the
    /// loading flag. Unless `force` is set, nothing happens when neither
    /// changed since the last trigger.
    fn emit_trigger(&mut self, force: bool) {
        let unchanged = {
            let last = self.triggers.borrow();
            last.search == self.state.search_term && last.page == self.state.current_page
        };
        if unchanged && !force {
            return;
        }

        self.generation += 1;
        self.state.is_loading = true;
        self.triggers.send_replace(Trigger {
            search: self.state.search_term.clone(),
            page: self.state.current_page,
            generation: self.generation,
        });
        debug!(generation = self.generation, "Trigger emitted");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_set_search_term(&mut self, term: String, respond_to: ServiceResponse<(), StorefrontError>) {
        self.state.current_page = 0;
        self.state.search_term = term;
        self.emit_trigger(false);
        self.publish();
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_go_to_page(&mut self, page: u32, respond_to: ServiceResponse<(), StorefrontError>) {
        self.state.current_page = page;
        self.emit_trigger(false);
        self.publish();
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_id = product.product_id, stock = product.quantity), skip(self, product, respond_to))]
    fn handle_add_to_cart(&mut self, product: Product, respond_to: ServiceResponse<(), StorefrontError>) {
        if !product.in_stock() {
            warn!("Rejected add of out-of-stock product");
            let _ = respond_to.send(Err(StorefrontError::ProductUnavailable(product.product_id)));
            return;
        }

        self.state.cart.add_item(&product);
        debug!(cart_items = self.state.cart.len(), "Cart updated");
        self.publish();
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_update_quantity(
        &mut self,
        product_id: i64,
        delta: i64,
        respond_to: ServiceResponse<(), StorefrontError>,
    ) {
        self.state.cart.update_quantity(product_id, delta);
        debug!(cart_items = self.state.cart.len(), "Cart updated");
        self.publish();
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, result))]
    fn handle_products_loaded(&mut self, generation: u64, result: Result<Page<Product>, ApiError>) {
        if generation != self.generation {
            warn!(current = self.generation, "Discarding stale product page");
            return;
        }

        match result {
            Ok(page) => {
                info!(products = page.content.len(), total_pages = page.total_pages, "Products loaded");
                self.state.products = page;
                self.state.catalog_error = false;
            }
            Err(e) => {
                error!(error = %e, "Failed to load products");
                self.state.products = Page::empty(self.state.current_page, self.state.page_size);
                self.state.catalog_error = true;
                self.state.checkout_error = Some(CheckoutFailure::default());
            }
        }
        self.state.is_loading = false;
        self.publish();
    }

    /// Submits the cart in a background task that owns `respond_to`; the
    /// outcome comes back as `CheckoutCompleted`.
    #[instrument(fields(cart_items = self.state.cart.len()), skip(self, respond_to))]
    fn handle_checkout(&mut self, respond_to: ServiceResponse<OrderReceipt, StorefrontError>) {
        if self.state.cart.is_empty() {
            debug!("Checkout ignored: empty cart");
            let _ = respond_to.send(Err(StorefrontError::EmptyCart));
            return;
        }
        if self.state.checkout_in_flight {
            warn!("Checkout ignored: submission already in progress");
            let _ = respond_to.send(Err(StorefrontError::CheckoutInProgress));
            return;
        }

        self.state.checkout_success_message = None;
        self.state.checkout_error = None;
        self.state.checkout_in_flight = true;
        self.publish();

        let order = OrderRequest {
            items: self.state.cart.order_items(),
        };
        let api = Arc::clone(&self.api);
        let mailbox = self.sender.clone();
        tokio::spawn(
            async move {
                info!("Submitting order");
                let result = api.submit_order(order).await;
                let _ = mailbox
                    .send(StorefrontRequest::CheckoutCompleted { result, respond_to })
                    .await;
            }
            .in_current_span(),
        );
    }

    #[instrument(skip(self, result, respond_to))]
    fn handle_checkout_completed(
        &mut self,
        result: Result<OrderReceipt, ApiError>,
        respond_to: ServiceResponse<OrderReceipt, StorefrontError>,
    ) {
        self.state.checkout_in_flight = false;

        let outcome = match result {
            Ok(receipt) => {
                info!(order_id = %receipt.id, "Order created successfully");
                self.state.checkout_success_message = Some(receipt.success_message());
                self.state.cart.clear();
                self.state.current_page = 0;
                // Stock changed server-side: refetch even if the query is unchanged.
                self.emit_trigger(true);
                Ok(receipt)
            }
            Err(ApiError::Conflict(unavailable)) => {
                warn!(unavailable = unavailable.len(), "Checkout rejected: insufficient stock");
                self.state.checkout_error = Some(CheckoutFailure {
                    unavailable_products: unavailable.clone(),
                });
                Err(StorefrontError::OutOfStock(unavailable))
            }
            Err(e) => {
                error!(error = %e, "Checkout failed");
                self.state.checkout_error = Some(CheckoutFailure::default());
                Err(StorefrontError::CheckoutFailed(e.to_string()))
            }
        };

        self.publish();
        let _ = respond_to.send(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::create_mock_api;
    use rust_decimal_macros::dec;

    fn page_of(products: Vec<Product>, number: u32) -> Page<Product> {
        Page {
            total_elements: products.len() as u64,
            content: products,
            total_pages: 1,
            number,
            size: 6,
        }
    }

    /// Starts the service alone; product results are posted by hand.
    fn start_service() -> (StorefrontClient, mpsc::Sender<StorefrontRequest>) {
        let (api, _calls) = create_mock_api(16);
        let (service, _fetcher, client) = StorefrontService::new(&StorefrontConfig::default(), api);
        let mailbox = service.sender.clone();
        tokio::spawn(service.run());
        (client, mailbox)
    }

    #[tokio::test]
    async fn test_only_current_generation_is_applied() {
        let (client, mailbox) = start_service();
        client.set_search_term("arroz".to_string()).await.unwrap();

        let stale = page_of(vec![Product::new(1, "Stale", 3, dec!(1))], 0);
        mailbox
            .send(StorefrontRequest::ProductsLoaded { generation: 0, result: Ok(stale) })
            .await
            .unwrap();
        let view = client.snapshot().await.unwrap();
        assert!(view.products().is_empty());
        assert!(view.is_loading);

        let fresh = page_of(vec![Product::new(2, "Arroz", 3, dec!(1))], 0);
        mailbox
            .send(StorefrontRequest::ProductsLoaded { generation: 1, result: Ok(fresh.clone()) })
            .await
            .unwrap();
        let view = client.snapshot().await.unwrap();
        assert_eq!(view.products, fresh);
        assert!(!view.is_loading);

        client.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_unchanged_query_emits_no_trigger() {
        let (client, mailbox) = start_service();

        // ("", 0) is the initial trigger; re-selecting it does not bump the generation.
        client.set_search_term(String::new()).await.unwrap();
        client.go_to_page(0).await.unwrap();

        let page = page_of(vec![Product::new(1, "Sal", 3, dec!(2))], 0);
        mailbox
            .send(StorefrontRequest::ProductsLoaded { generation: 0, result: Ok(page.clone()) })
            .await
            .unwrap();
        let view = client.snapshot().await.unwrap();
        assert_eq!(view.products, page);

        client.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_failure_substitutes_empty_page() {
        let (client, mailbox) = start_service();
        client.go_to_page(2).await.unwrap();

        let error = ApiError::Status { status: 503, url: "http://localhost:8080/products".to_string() };
        mailbox
            .send(StorefrontRequest::ProductsLoaded { generation: 1, result: Err(error) })
            .await
            .unwrap();

        let view = client.snapshot().await.unwrap();
        assert!(!view.is_loading);
        assert!(view.catalog_error);
        assert_eq!(view.products, Page::empty(2, 6));
        assert_eq!(view.checkout_error, Some(CheckoutFailure::default()));

        client.shutdown().await.unwrap();
    }
}
