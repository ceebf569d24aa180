use async_trait::async_trait;
use reqwest::{Client, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use super::{ProductQuery, StorefrontApi};
use crate::config::StorefrontConfig;
use crate::domain::{OrderReceipt, OrderRequest, Page, Product, UnavailableProduct};
use crate::error::ApiError;

/// `reqwest`-backed implementation of [`StorefrontApi`].
#[derive(Clone)]
pub struct HttpStorefrontApi {
    client: Client,
    base_url: String,
}

impl HttpStorefrontApi {
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    fn products_request(&self, query: &ProductQuery) -> Result<Request, ApiError> {
        self.client
            .get(format!("{}/products", self.base_url))
            .query(&[
                ("page", query.page.to_string()),
                ("size", query.size.to_string()),
                ("search", query.search.clone()),
            ])
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    fn order_request(&self, order: &OrderRequest) -> Result<Request, ApiError> {
        self.client
            .post(format!("{}/orders", self.base_url))
            .json(order)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    async fn send(&self, request: Request) -> Result<Response, ApiError> {
        self.client.execute(request).await.map_err(|e| {
            error!(error = %e, "Request failed");
            ApiError::Transport(e.to_string())
        })
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

fn status_error(response: &Response) -> ApiError {
    ApiError::Status {
        status: response.status().as_u16(),
        url: response.url().to_string(),
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    #[instrument(skip(self), fields(page = query.page, search = %query.search))]
    async fn fetch_products(&self, query: ProductQuery) -> Result<Page<Product>, ApiError> {
        debug!("Sending request");
        let response = self.send(self.products_request(&query)?).await?;

        if !response.status().is_success() {
            let err = status_error(&response);
            error!(error = %err, "Product listing failed");
            return Err(err);
        }
        read_json(response).await
    }

    #[instrument(skip(self, order), fields(items = order.items.len()))]
    async fn submit_order(&self, order: OrderRequest) -> Result<OrderReceipt, ApiError> {
        debug!("Sending request");
        let response = self.send(self.order_request(&order)?).await?;

        match response.status() {
            status if status.is_success() => read_json(response).await,
            StatusCode::CONFLICT => {
                let err = status_error(&response);
                match read_json::<Vec<UnavailableProduct>>(response).await {
                    Ok(unavailable) => Err(ApiError::Conflict(unavailable)),
                    Err(decode) => {
                        error!(error = %decode, "Unreadable conflict body");
                        Err(err)
                    }
                }
            }
            _ => {
                let err = status_error(&response);
                error!(error = %err, "Order submission failed");
                Err(err)
            }
        }
    }
}
