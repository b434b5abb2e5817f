//! Session, pagination, and staleness behavior of the search controller.
//!
//! These suites use the channel-backed mock service: the test receives each
//! page request (query, offset, cancellation token) and chooses when and how
//! it settles, which makes the supersede/stale races deterministic.

use catalog_browser::controller::{SearchController, SearchControllerHandle};
use catalog_browser::model::{Product, ProductPage};
use catalog_browser::route::Route;
use catalog_browser::service::mock::{create_mock_service, expect_search, ServiceRequest};
use catalog_browser::service::{SearchApiError, PAGE_SIZE};
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tokio::task::yield_now;

struct ControllerFixture {
    handle: SearchControllerHandle,
    routes: watch::Sender<Route>,
    requests: mpsc::Receiver<ServiceRequest>,
}

fn spawn_controller(initial: Route) -> ControllerFixture {
    let (service, requests) = create_mock_service(8);
    let (route_tx, route_rx) = watch::channel(initial);
    let (controller, handle) = SearchController::new(route_rx, Arc::new(service));
    tokio::spawn(controller.run());
    ControllerFixture {
        handle,
        routes: route_tx,
        requests,
    }
}

fn page_of(ids: &[&str], total: u32, skip: u32) -> ProductPage {
    ProductPage {
        products: ids
            .iter()
            .map(|id| Product::new(*id, format!("Product {id}"), 49.99, 12))
            .collect(),
        total,
        skip,
        limit: PAGE_SIZE,
    }
}

fn ids(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

/// Lets the controller and its fetch tasks process everything in flight.
async fn settle() {
    for _ in 0..32 {
        yield_now().await;
    }
}

fn assert_no_request(fixture: &mut ControllerFixture) {
    assert!(matches!(
        fixture.requests.try_recv(),
        Err(TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn deep_link_starts_a_session_immediately() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (query, skip, _cancel, _respond_to) =
        expect_search(&mut fixture.requests).await.unwrap();
    assert_eq!((query.as_str(), skip), ("phone", 0));

    let snapshot = fixture.handle.results();
    assert!(snapshot.is_loading_first);
    assert!(snapshot.items.is_empty());
}

#[tokio::test]
async fn starting_on_the_landing_page_fetches_nothing() {
    let mut fixture = spawn_controller(Route::home());
    settle().await;

    assert_no_request(&mut fixture);
    let snapshot = fixture.handle.results();
    assert!(snapshot.query.is_empty());
    assert!(!snapshot.is_loading_first);
}

#[tokio::test]
async fn first_page_applies_and_derives_has_more() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to.send(Ok(page_of(&["p1", "p2"], 4, 0))).unwrap();
    settle().await;

    let snapshot = fixture.handle.results();
    assert_eq!(ids(&snapshot.items), ["p1", "p2"]);
    assert_eq!(snapshot.total, 4);
    assert!(snapshot.has_more);
    assert!(!snapshot.is_loading_first);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn sentinel_loads_the_next_page_end_to_end() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to.send(Ok(page_of(&["p1", "p2"], 4, 0))).unwrap();
    settle().await;

    fixture.handle.sentinel_visible(true).await;
    settle().await;
    assert!(fixture.handle.results().is_loading_next);

    let (query, skip, _cancel, respond_to) =
        expect_search(&mut fixture.requests).await.unwrap();
    assert_eq!((query.as_str(), skip), ("phone", 2));
    respond_to.send(Ok(page_of(&["p3", "p4"], 4, 2))).unwrap();
    settle().await;

    let snapshot = fixture.handle.results();
    assert_eq!(ids(&snapshot.items), ["p1", "p2", "p3", "p4"]);
    assert!(!snapshot.has_more);
    assert!(!snapshot.is_loading_next);
}

#[tokio::test]
async fn sentinel_is_ignored_while_the_first_page_loads() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (.., _held_responder) = expect_search(&mut fixture.requests).await.unwrap();

    fixture.handle.sentinel_visible(true).await;
    settle().await;

    assert_no_request(&mut fixture);
}

#[tokio::test]
async fn sentinel_is_ignored_while_the_next_page_loads() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to.send(Ok(page_of(&["p1", "p2"], 40, 0))).unwrap();
    settle().await;

    fixture.handle.sentinel_visible(true).await;
    let (.., _held_responder) = expect_search(&mut fixture.requests).await.unwrap();

    // Leaving and re-entering view while the fetch is in flight must not
    // issue a duplicate request.
    fixture.handle.sentinel_visible(false).await;
    fixture.handle.sentinel_visible(true).await;
    settle().await;

    assert_no_request(&mut fixture);
}

#[tokio::test]
async fn sentinel_triggers_only_on_the_transition_into_view() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to.send(Ok(page_of(&["p1", "p2"], 40, 0))).unwrap();
    settle().await;

    fixture.handle.sentinel_visible(true).await;
    let (_query, skip, _cancel, respond_to) =
        expect_search(&mut fixture.requests).await.unwrap();
    assert_eq!(skip, 2);
    respond_to.send(Ok(page_of(&["p3", "p4"], 40, 2))).unwrap();
    settle().await;

    // Still visible after the page applied: no transition, no fetch.
    fixture.handle.sentinel_visible(true).await;
    settle().await;
    assert_no_request(&mut fixture);

    // Out of view and back in: that is a transition.
    fixture.handle.sentinel_visible(false).await;
    fixture.handle.sentinel_visible(true).await;
    let (_query, skip, _cancel, _respond_to) =
        expect_search(&mut fixture.requests).await.unwrap();
    assert_eq!(skip, 4);
}

#[tokio::test]
async fn query_change_cancels_and_discards_the_superseded_fetch() {
    let mut fixture = spawn_controller(Route::search("first"));

    let (.., first_cancel, first_responder) =
        expect_search(&mut fixture.requests).await.unwrap();

    fixture.routes.send(Route::search("second")).unwrap();
    let (query, skip, _cancel, second_responder) =
        expect_search(&mut fixture.requests).await.unwrap();
    assert_eq!((query.as_str(), skip), ("second", 0));
    assert!(first_cancel.is_cancelled());

    // Settle the superseded fetch anyway; it must not touch the session.
    let _ = first_responder.send(Ok(page_of(&["stale"], 1, 0)));
    settle().await;

    let snapshot = fixture.handle.results();
    assert_eq!(snapshot.query, "second");
    assert!(snapshot.items.is_empty());
    assert!(snapshot.is_loading_first);
    assert!(snapshot.error.is_none());

    // The live fetch still applies.
    second_responder.send(Ok(page_of(&["p1"], 1, 0))).unwrap();
    settle().await;
    assert_eq!(ids(&fixture.handle.results().items), ["p1"]);
}

#[tokio::test]
async fn stale_failure_is_discarded_silently() {
    let mut fixture = spawn_controller(Route::search("first"));

    let (.., first_responder) = expect_search(&mut fixture.requests).await.unwrap();
    fixture.routes.send(Route::search("second")).unwrap();
    let (.., _second_responder) = expect_search(&mut fixture.requests).await.unwrap();

    let _ = first_responder.send(Err(SearchApiError::RequestFailed { status: 500 }));
    settle().await;

    assert!(fixture.handle.results().error.is_none());
}

#[tokio::test]
async fn query_change_resets_accumulated_results() {
    let mut fixture = spawn_controller(Route::search("first"));

    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to.send(Ok(page_of(&["p1", "p2"], 2, 0))).unwrap();
    settle().await;
    assert_eq!(fixture.handle.results().items.len(), 2);

    fixture.routes.send(Route::search("second")).unwrap();
    settle().await;

    let snapshot = fixture.handle.results();
    assert_eq!(snapshot.query, "second");
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.total, 0);
    assert!(!snapshot.has_more);
    assert!(snapshot.is_loading_first);
}

#[tokio::test]
async fn navigating_home_clears_the_session() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to.send(Ok(page_of(&["p1"], 10, 0))).unwrap();
    settle().await;

    fixture.routes.send(Route::home()).unwrap();
    settle().await;

    let snapshot = fixture.handle.results();
    assert!(snapshot.query.is_empty());
    assert!(snapshot.items.is_empty());
    assert!(!snapshot.has_more);

    // No session: the sentinel does nothing.
    fixture.handle.sentinel_visible(true).await;
    settle().await;
    assert_no_request(&mut fixture);
}

#[tokio::test]
async fn first_page_failure_surfaces_with_no_items() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to
        .send(Err(SearchApiError::RequestFailed { status: 500 }))
        .unwrap();
    settle().await;

    let snapshot = fixture.handle.results();
    assert!(snapshot.items.is_empty());
    assert!(!snapshot.is_loading_first);
    assert!(matches!(
        snapshot.error.as_deref(),
        Some(SearchApiError::RequestFailed { status: 500 })
    ));

    // A failed session does not retry from the sentinel.
    fixture.handle.sentinel_visible(true).await;
    settle().await;
    assert_no_request(&mut fixture);
}

#[tokio::test]
async fn next_page_failure_retains_loaded_items() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to.send(Ok(page_of(&["p1", "p2"], 40, 0))).unwrap();
    settle().await;

    fixture.handle.sentinel_visible(true).await;
    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to
        .send(Err(SearchApiError::RequestFailed { status: 502 }))
        .unwrap();
    settle().await;

    let snapshot = fixture.handle.results();
    assert_eq!(ids(&snapshot.items), ["p1", "p2"]);
    assert!(snapshot.error.is_some());
    assert!(!snapshot.is_loading_next);
}

#[tokio::test]
async fn aborted_settlement_is_never_surfaced() {
    let mut fixture = spawn_controller(Route::search("phone"));

    let (.., respond_to) = expect_search(&mut fixture.requests).await.unwrap();
    respond_to.send(Err(SearchApiError::Aborted)).unwrap();
    settle().await;

    let snapshot = fixture.handle.results();
    assert!(snapshot.error.is_none());
    // The session is still waiting on its first page, not failed.
    assert!(snapshot.is_loading_first);
}
