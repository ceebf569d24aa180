use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::actors::StorefrontService;
use crate::api::StorefrontApi;
use crate::clients::StorefrontClient;
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;

/// Starts the storefront actor and its catalog fetcher, and stops them again.
pub struct StorefrontSystem {
    pub client: StorefrontClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Spawns both tasks. The first catalog page is requested right away
    /// (after the debounce window) with an empty search.
    #[instrument(name = "storefront_system", skip(config, api), fields(api_url = %config.api_url))]
    pub fn new(config: &StorefrontConfig, api: Arc<dyn StorefrontApi>) -> Self {
        info!("Starting storefront system");

        let (service, fetcher, client) = StorefrontService::new(config, api);
        let handles = vec![tokio::spawn(service.run()), tokio::spawn(fetcher.run())];

        info!("Storefront system started successfully");
        Self { client, handles }
    }

    /// Stops the actor; the fetcher follows once its trigger channel closes.
    ///
    /// Fails if a task panicked or was cancelled, or if the actor was
    /// already gone when the stop request was sent.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), StorefrontError> {
        info!("Shutting down storefront system");

        let stop = self.client.shutdown().await;
        if let Err(e) = &stop {
            warn!(error = %e, "Storefront actor was not reachable");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Storefront task failed");
                return Err(StorefrontError::ActorCommunicationError(format!(
                    "Storefront task failed: {}",
                    e
                )));
            }
        }

        stop?;
        info!("Storefront system shutdown complete");
        Ok(())
    }
}
