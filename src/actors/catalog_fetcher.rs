use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument};

use crate::api::{ProductQuery, StorefrontApi};
use crate::messages::StorefrontRequest;

/// The (search term, page) pair that drives a catalog fetch.
///
/// `generation` increases with every emitted trigger, so a forced refresh of
/// an unchanged search still counts as a new trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub search: String,
    pub page: u32,
    pub generation: u64,
}

impl Trigger {
    pub fn initial() -> Self {
        Self {
            search: String::new(),
            page: 0,
            generation: 0,
        }
    }
}

enum Settled {
    Quiet,
    Closed,
}

/// Turns triggers into product requests.
///
/// Only the latest trigger is ever looked at. A request goes out once the
/// trigger has been stable for the debounce window, and an in-flight request is
/// dropped as soon as a newer trigger shows up. Results are posted back to the
/// storefront actor tagged with their generation.
pub struct CatalogFetcher {
    api: Arc<dyn StorefrontApi>,
    triggers: watch::Receiver<Trigger>,
    results: mpsc::Sender<StorefrontRequest>,
    debounce: Duration,
    page_size: u32,
}

impl CatalogFetcher {
    pub fn new(
        api: Arc<dyn StorefrontApi>,
        triggers: watch::Receiver<Trigger>,
        results: mpsc::Sender<StorefrontRequest>,
        debounce: Duration,
        page_size: u32,
    ) -> Self {
        Self {
            api,
            triggers,
            results,
            debounce,
            page_size,
        }
    }

    #[instrument(name = "catalog_fetcher", skip(self))]
    pub async fn run(mut self) {
        info!("CatalogFetcher starting");

        // The initial trigger is fetched without waiting for a change.
        let mut pending = true;
        loop {
            if !pending && self.triggers.changed().await.is_err() {
                break;
            }

            if let Settled::Closed = self.settle().await {
                break;
            }

            let trigger = self.triggers.borrow_and_update().clone();
            let query = ProductQuery {
                page: trigger.page,
                size: self.page_size,
                search: trigger.search.clone(),
            };
            debug!(generation = trigger.generation, page = query.page, search = %query.search, "Fetching products");

            tokio::select! {
                result = self.api.fetch_products(query) => {
                    pending = false;
                    let loaded = StorefrontRequest::ProductsLoaded {
                        generation: trigger.generation,
                        result,
                    };
                    if self.results.send(loaded).await.is_err() {
                        break;
                    }
                }
                changed = self.triggers.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    debug!(generation = trigger.generation, "Fetch superseded by a newer trigger");
                    pending = true;
                }
            }
        }

        info!("CatalogFetcher stopped");
    }

    /// Waits until no trigger change has been seen for a full debounce window.
    async fn settle(&mut self) -> Settled {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.debounce) => return Settled::Quiet,
                changed = self.triggers.changed() => {
                    if changed.is_err() {
                        return Settled::Closed;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Page;
    use crate::mock_framework::{create_mock_api, expect_fetch};

    fn spawn_fetcher(
        debounce: Duration,
    ) -> (
        watch::Sender<Trigger>,
        mpsc::Receiver<StorefrontRequest>,
        mpsc::Receiver<crate::mock_framework::ApiCall>,
    ) {
        let (api, calls) = create_mock_api(16);
        let (trigger_tx, trigger_rx) = watch::channel(Trigger::initial());
        let (results_tx, results_rx) = mpsc::channel(16);
        let fetcher = CatalogFetcher::new(api, trigger_rx, results_tx, debounce, 6);
        tokio::spawn(fetcher.run());
        (trigger_tx, results_rx, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_trigger_is_fetched_after_debounce() {
        let start = tokio::time::Instant::now();
        let (_triggers, mut results, mut calls) = spawn_fetcher(Duration::from_millis(300));

        let (query, responder) = expect_fetch(&mut calls).await.expect("Expected initial fetch");
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert_eq!(query, ProductQuery { page: 0, size: 6, search: String::new() });
        responder.send(Ok(Page::empty(0, 6))).unwrap();

        match results.recv().await {
            Some(StorefrontRequest::ProductsLoaded { generation, result }) => {
                assert_eq!(generation, 0);
                assert!(result.is_ok());
            }
            other => panic!("Unexpected message: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_fetch_is_dropped() {
        let (triggers, mut results, mut calls) = spawn_fetcher(Duration::from_millis(300));

        let (_, stale) = expect_fetch(&mut calls).await.expect("Expected initial fetch");
        triggers.send_replace(Trigger { search: "leite".to_string(), page: 0, generation: 1 });

        let (query, fresh) = expect_fetch(&mut calls).await.expect("Expected second fetch");
        assert_eq!(query.search, "leite");
        assert!(stale.send(Ok(Page::empty(0, 6))).is_err(), "stale request should be cancelled");

        fresh.send(Ok(Page::empty(0, 6))).unwrap();
        match results.recv().await {
            Some(StorefrontRequest::ProductsLoaded { generation, .. }) => assert_eq!(generation, 1),
            other => panic!("Unexpected message: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_trigger_sender_dropped() {
        let (api, _calls) = create_mock_api(16);
        let (trigger_tx, trigger_rx) = watch::channel(Trigger::initial());
        let (results_tx, _results_rx) = mpsc::channel(16);
        let handle = tokio::spawn(
            CatalogFetcher::new(api, trigger_rx, results_tx, Duration::from_millis(300), 6).run(),
        );

        drop(trigger_tx);
        handle.await.unwrap();
    }
}
