use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn, Instrument};

use storefront::config::{
    DEFAULT_API_URL, DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT,
};
use storefront::domain::{format_price, StorefrontView};
use storefront::{
    setup_tracing, HttpStorefrontApi, StorefrontClient, StorefrontConfig, StorefrontError,
    StorefrontSystem,
};

#[derive(Parser)]
#[command(name = "storefront", about = "Browse the catalog, fill a cart and place an order")]
struct Cli {
    /// Base URL of the product/order API.
    #[arg(long, env = "STOREFRONT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Products per catalog page.
    #[arg(long, env = "STOREFRONT_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Quiet window before a search is sent, in milliseconds.
    #[arg(long, env = "STOREFRONT_DEBOUNCE_MS", default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
    debounce_ms: u64,

    /// Per-request HTTP timeout, in seconds.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    request_timeout_secs: u64,

    /// Search by product name.
    #[arg(long)]
    search: Option<String>,

    /// Catalog page to show (1-based).
    #[arg(long)]
    page: Option<u32>,

    /// Comma-separated product ids to add; repeat an id to add more units
    /// (e.g. "3,3,7").
    #[arg(long, value_delimiter = ',')]
    add: Vec<i64>,

    /// Submit the cart as an order.
    #[arg(long)]
    checkout: bool,
}

impl Cli {
    fn config(&self) -> Result<StorefrontConfig, String> {
        let config = StorefrontConfig::new(&self.api_url)
            .and_then(|c| c.with_page_size(self.page_size))
            .map_err(|e| e.to_string())?;
        Ok(config
            .with_debounce(Duration::from_millis(self.debounce_ms))
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs)))
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    setup_tracing();

    let config = cli.config()?;
    let api = HttpStorefrontApi::new(&config).map_err(|e| e.to_string())?;

    info!(api_url = %config.api_url, "Starting storefront");
    let system = StorefrontSystem::new(&config, Arc::new(api));

    let span = tracing::info_span!("storefront_session");
    let result = run(&cli, &system.client).instrument(span).await;
    if let Err(e) = &result {
        error!(error = %e, "Session failed");
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    result.map_err(|e| e.to_string())
}

async fn run(cli: &Cli, client: &StorefrontClient) -> Result<(), StorefrontError> {
    if let Some(term) = &cli.search {
        client.set_search_term(term.clone()).await?;
    }
    if let Some(page) = cli.page {
        client.go_to_page(page.saturating_sub(1)).await?;
    }

    let view = client.wait_until_loaded().await?;
    print_catalog(&view);

    for id in &cli.add {
        match view.products().iter().find(|p| p.product_id == *id) {
            Some(product) => {
                if let Err(e) = client.add_to_cart(product.clone()).await {
                    warn!(product_id = id, error = %e, "Could not add product");
                }
            }
            None => warn!(product_id = id, "Product is not on the current page"),
        }
    }

    print_cart(&client.snapshot().await?);

    if cli.checkout {
        match client.checkout().await {
            Ok(receipt) => println!("\n{}", receipt.success_message()),
            Err(StorefrontError::OutOfStock(unavailable)) => {
                println!("\nCheckout failed! Unavailable products:");
                for p in unavailable {
                    println!("  product {}: {} available", p.product_id, p.available);
                }
            }
            Err(StorefrontError::EmptyCart) => println!("\nCart is empty, nothing to order."),
            Err(e) => println!("\nCheckout failed: {}", e),
        }
    }
    Ok(())
}

fn print_catalog(view: &StorefrontView) {
    if view.products().is_empty() {
        println!("No products found. Check that the API is running.");
        return;
    }

    for product in view.products() {
        let availability = if view.can_add(product) {
            format!("{} available", product.quantity)
        } else {
            "unavailable".to_string()
        };
        println!(
            "[{:>4}] {:<32} {:>14}  {}",
            product.product_id,
            product.name,
            format_price(product.price),
            availability
        );
    }
    if view.total_pages() > 1 {
        println!("page {} of {}", view.current_page + 1, view.total_pages());
    }
}

fn print_cart(view: &StorefrontView) {
    println!("\nCart");
    if view.cart.is_empty() {
        println!("  (empty)");
        return;
    }
    for item in view.cart.items() {
        println!(
            "  {} - {} x {}",
            item.name,
            format_price(item.price),
            item.quantity
        );
    }
    println!("  Total: {}", format_price(view.cart_total()));
}
