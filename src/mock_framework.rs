//! # Mock Framework
//!
//! A [`StorefrontApi`] whose calls land on a channel the test controls.
//!
//! Use [`create_mock_api`] to get the API and a receiver, then [`expect_fetch`]
//! or [`expect_submit`] to take the next call and answer it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::api::{ProductQuery, StorefrontApi};
use crate::domain::{OrderReceipt, OrderRequest, Page, Product};
use crate::error::ApiError;

pub type ApiResponder<T> = oneshot::Sender<Result<T, ApiError>>;

#[derive(Debug)]
pub enum ApiCall {
    FetchProducts {
        query: ProductQuery,
        respond_to: ApiResponder<Page<Product>>,
    },
    SubmitOrder {
        order: OrderRequest,
        respond_to: ApiResponder<OrderReceipt>,
    },
}

/// Forwards every call to the test and waits for its answer.
///
/// Dropping the call future (as the catalog fetcher does on a newer trigger)
/// closes the responder, which the test can observe.
pub struct MockApi {
    sender: mpsc::Sender<ApiCall>,
}

pub fn create_mock_api(buffer_size: usize) -> (Arc<MockApi>, mpsc::Receiver<ApiCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (Arc::new(MockApi { sender }), receiver)
}

#[async_trait]
impl StorefrontApi for MockApi {
    async fn fetch_products(&self, query: ProductQuery) -> Result<Page<Product>, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ApiCall::FetchProducts { query, respond_to })
            .await
            .map_err(|_| ApiError::Transport("Mock closed".to_string()))?;
        response.await.map_err(|_| ApiError::Transport("Mock dropped".to_string()))?
    }

    async fn submit_order(&self, order: OrderRequest) -> Result<OrderReceipt, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ApiCall::SubmitOrder { order, respond_to })
            .await
            .map_err(|_| ApiError::Transport("Mock closed".to_string()))?;
        response.await.map_err(|_| ApiError::Transport("Mock dropped".to_string()))?
    }
}

/// Helper to verify that the next call is a product fetch
pub async fn expect_fetch(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(ProductQuery, ApiResponder<Page<Product>>)> {
    match receiver.recv().await {
        Some(ApiCall::FetchProducts { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is an order submission
pub async fn expect_submit(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(OrderRequest, ApiResponder<OrderReceipt>)> {
    match receiver.recv().await {
        Some(ApiCall::SubmitOrder { order, respond_to }) => Some((order, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderId, OrderItemRequest};

    #[tokio::test]
    async fn test_mock_api() {
        let (api, mut receiver) = create_mock_api(10);

        let submit_task = tokio::spawn(async move {
            let order = OrderRequest {
                items: vec![OrderItemRequest { product_id: 1, quantity: 2 }],
            };
            api.submit_order(order).await
        });

        let (order, responder) = expect_submit(&mut receiver).await.expect("Expected SubmitOrder call");
        assert_eq!(order.items[0].quantity, 2);
        responder.send(Ok(OrderReceipt { id: OrderId::Number(7) })).unwrap();

        let result = submit_task.await.unwrap();
        assert_eq!(result, Ok(OrderReceipt { id: OrderId::Number(7) }));
    }
}
