//! Full end-to-end integration tests with all real actors.
//!
//! The router, query sync, and search controller are wired exactly as in
//! production by [`CatalogSystem`]; only the search backend is a mock with
//! queued expectations. Time is paused, so the debounce windows are driven
//! by explicit `advance` calls.

use catalog_browser::lifecycle::CatalogSystem;
use catalog_browser::model::{Product, ProductPage};
use catalog_browser::route::{Route, HOME_PATH, SEARCH_PATH};
use catalog_browser::service::mock::MockSearchService;
use catalog_browser::service::{SearchApiError, PAGE_SIZE};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::yield_now;
use tokio::time::advance;

const DEBOUNCE: Duration = Duration::from_millis(300);

fn page_of(ids: &[&str], total: u32, skip: u32) -> ProductPage {
    ProductPage {
        products: ids
            .iter()
            .map(|id| Product::new(*id, format!("Product {id}"), 19.99, 3))
            .collect(),
        total,
        skip,
        limit: PAGE_SIZE,
    }
}

fn ids(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

/// Lets every actor and fetch task process what is already in flight.
async fn settle() {
    for _ in 0..32 {
        yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn typed_search_flows_from_keystrokes_to_scrolled_results() {
    let mut mock = MockSearchService::new();
    mock.expect_search("lamp", 0)
        .return_ok(page_of(&["1", "2"], 4, 0));
    mock.expect_search("lamp", 2)
        .return_ok(page_of(&["3", "4"], 4, 2));

    let system = CatalogSystem::new(Arc::new(mock.service()));

    // Type with pauses shorter than the debounce window: only the final
    // value reaches the route.
    for value in ["l", "la", "lamp"] {
        system.search.set(value).await;
        settle().await;
        advance(Duration::from_millis(100)).await;
    }
    advance(DEBOUNCE).await;
    settle().await;

    assert_eq!(system.router.current().path, SEARCH_PATH);
    let results = system.results.results();
    assert_eq!(results.query, "lamp");
    assert_eq!(ids(&results.items), ["1", "2"]);
    assert_eq!(results.total, 4);
    assert!(results.has_more);

    // Scroll until the sentinel enters view: the next page is appended.
    system.results.sentinel_visible(true).await;
    settle().await;

    let results = system.results.results();
    assert_eq!(ids(&results.items), ["1", "2", "3", "4"]);
    assert!(!results.has_more);

    // Re-submitting the same query re-navigates (no dedup) but the session
    // stands: nothing is refetched, nothing is reset.
    system.search.set("lamp").await;
    settle().await;
    advance(DEBOUNCE).await;
    settle().await;
    assert_eq!(system.results.results().items.len(), 4);

    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn deep_link_loads_and_clearing_the_search_goes_home() {
    let mut mock = MockSearchService::new();
    mock.expect_search("desk", 0).return_ok(page_of(&["1"], 1, 0));

    let system =
        CatalogSystem::with_initial_route(Arc::new(mock.service()), Route::search("desk"));
    settle().await;

    // The search box is seeded from the deep link and the page is loaded.
    assert_eq!(system.search.value(), "desk");
    assert_eq!(system.results.results().items.len(), 1);

    // Clearing the box (whitespace counts as empty) navigates home and
    // tears the session down.
    system.search.set("   ").await;
    settle().await;
    advance(DEBOUNCE).await;
    settle().await;

    assert_eq!(system.router.current().path, HOME_PATH);
    let results = system.results.results();
    assert!(results.items.is_empty());
    assert!(results.query.is_empty());
    // The route change also flowed back into the search box.
    assert_eq!(system.search.value(), "");

    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn backend_failure_surfaces_and_a_new_query_recovers() {
    let mut mock = MockSearchService::new();
    mock.expect_search("tv", 0)
        .return_err(SearchApiError::RequestFailed { status: 500 });
    mock.expect_search("radio", 0)
        .return_ok(page_of(&["1"], 1, 0));

    let system = CatalogSystem::new(Arc::new(mock.service()));

    system.search.set("tv").await;
    settle().await;
    advance(DEBOUNCE).await;
    settle().await;

    let results = system.results.results();
    assert!(results.error.is_some());
    assert!(results.items.is_empty());

    system.search.set("radio").await;
    settle().await;
    advance(DEBOUNCE).await;
    settle().await;

    let results = system.results.results();
    assert!(results.error.is_none());
    assert_eq!(ids(&results.items), ["1"]);

    mock.verify();
    system.shutdown().await.unwrap();
}
