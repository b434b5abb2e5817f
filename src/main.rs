//! # Catalog Browser Demo
//!
//! A scripted browsing session against the live catalog API, demonstrating:
//! 1. Loading the landing-page feed.
//! 2. Typing into the search box (edits collapse into one debounced
//!    navigation).
//! 3. Infinite scroll: the sentinel coming into view loads the next page.
//! 4. Clearing the search, which navigates back home and ends the session.
//!
//! Run with `RUST_LOG=info cargo run`; set `PRODUCTS_API_URL` to point at a
//! different API.

use catalog_browser::controller::SearchResults;
use catalog_browser::display::{format_price, star_counts};
use catalog_browser::lifecycle::{setup_tracing, CatalogSystem};
use catalog_browser::model::Product;
use catalog_browser::route::HOME_PATH;
use catalog_browser::service::http::{HttpProductSearch, DEFAULT_API_BASE_URL};
use catalog_browser::service::ProductSearchService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, Instrument};

const SEARCH_QUERY: &str = "phone";
const RESULTS_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting catalog browser");

    let base_url =
        std::env::var("PRODUCTS_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    let service = Arc::new(HttpProductSearch::new(base_url));

    // Landing page: the product feed, before any search happens.
    let span = tracing::info_span!("landing_feed");
    let feed = async {
        info!("Loading landing page feed");
        service
            .fetch_all(CancellationToken::new())
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    println!("— Catalog ({} products) —", feed.total);
    for product in feed.products.iter().take(5) {
        println!("{}", product_line(product));
    }

    let system = CatalogSystem::new(service);
    let mut results = system.results.watch_results();

    // Type the query in bursts shorter than the debounce window; only the
    // final value navigates.
    let span = tracing::info_span!("search", query = SEARCH_QUERY);
    let first_page = async {
        for len in 1..=SEARCH_QUERY.len() {
            system.search.set(&SEARCH_QUERY[..len]).await;
            tokio::time::sleep(Duration::from_millis(80)).await;
        }
        info!("Waiting for first results page");
        wait_for_results(&mut results).await
    }
    .instrument(span)
    .await?;

    println!(
        "\n— Search results for \"{}\" ({} products) —",
        first_page.query, first_page.total
    );
    for product in &first_page.items {
        println!("{}", product_line(product));
    }

    // Scroll: the sentinel enters view, one more page loads.
    if first_page.has_more {
        info!("Sentinel visible, loading next page");
        system.results.sentinel_visible(true).await;
        let more = wait_for_results(&mut results).await?;
        println!("\n— After scrolling ({} loaded) —", more.items.len());
        for product in more.items.iter().skip(first_page.items.len()) {
            println!("{}", product_line(product));
        }
    }

    // Clear the search box; the debounced reconciliation navigates home.
    info!("Clearing search");
    system.search.set("").await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    let route = system.router.current();
    info!(path = %route.path, "Session ended");
    if route.path != HOME_PATH {
        return Err(format!("expected to land home, got {}", route.path));
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

/// Await the next settled snapshot: results applied or a surfaced failure.
async fn wait_for_results(
    results: &mut watch::Receiver<SearchResults>,
) -> Result<SearchResults, String> {
    let settled = tokio::time::timeout(RESULTS_TIMEOUT, async {
        loop {
            results.changed().await.map_err(|e| e.to_string())?;
            let snapshot = results.borrow().clone();
            if let Some(error) = &snapshot.error {
                return Err(error.to_string());
            }
            if !snapshot.is_loading_first && !snapshot.is_loading_next && !snapshot.query.is_empty()
            {
                return Ok(snapshot);
            }
        }
    })
    .await
    .map_err(|_| "timed out waiting for results".to_string())?;
    settled
}

fn product_line(product: &Product) -> String {
    let stars = star_counts(product.rating);
    let rendered: String = std::iter::repeat('★')
        .take(stars.full as usize)
        .chain(std::iter::repeat('⯨').take(stars.half as usize))
        .chain(std::iter::repeat('☆').take(stars.empty as usize))
        .collect();
    format!(
        "  {:40} {:>12}  {}  ({} in stock)",
        product.title,
        format_price(product.price),
        rendered,
        product.stock
    )
}
