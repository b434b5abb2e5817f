//! # Paginated Search Controller
//!
//! [`SearchController`] owns the results of the current search: it watches
//! the route for query changes, fetches pages from the
//! [`ProductSearchService`](crate::service::ProductSearchService), and
//! publishes an accumulated [`SearchResults`] snapshot on a watch channel.
//!
//! # Session state machine
//!
//! Each query gets one session:
//!
//! ```text
//! Idle → LoadingFirst → Ready ⇄ LoadingNext
//!        LoadingFirst | LoadingNext → Failed
//! ```
//!
//! Any route change to a *different* effective query tears the session down —
//! in-flight fetches for it are cancelled and their eventual settlements
//! discarded — and starts the next one. A `Failed` session stays failed until
//! the query changes; the sentinel signal does not retry it.
//!
//! # Staleness
//!
//! Every page fetch runs in its own task and reports back over the
//! controller's settlement channel, tagged with the **generation** it was
//! issued under. The generation counter increments on every query change, so
//! a settlement is applied only when its generation is still current.
//! Cancellation makes superseded fetches settle early, but the generation
//! check is what rejects them — a cancel can always race a slow settlement.
//!
//! # Load more
//!
//! The handle accepts the sentinel element's visibility; only the transition
//! into view counts. On that transition, a next page is requested only when
//! the session is exactly `Ready` with more results available, which makes
//! duplicate concurrent page fetches impossible by construction.

use crate::model::{Product, ProductPage};
use crate::route::Route;
use crate::service::{ProductSearchService, SearchApiError};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 32;
const SETTLEMENT_BUFFER: usize = 32;

/// Lifecycle of one search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// No query; nothing loaded, nothing in flight.
    Idle,
    /// First page of a fresh session is in flight.
    LoadingFirst,
    /// At least one page applied; accepting sentinel triggers.
    Ready,
    /// A follow-up page is in flight.
    LoadingNext,
    /// A fetch failed; terminal until the query changes.
    Failed,
}

/// Read model published by the controller.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// The query this snapshot belongs to.
    pub query: String,
    /// Accumulated products, in fetch order. Never re-sorted, never deduped.
    pub items: Vec<Product>,
    /// Total size of the result set, as reported by the first page.
    pub total: u32,
    pub is_loading_first: bool,
    pub is_loading_next: bool,
    pub has_more: bool,
    /// The failure that moved the session to `Failed`, if any. Shared so
    /// snapshots stay cheap to clone.
    pub error: Option<Arc<SearchApiError>>,
}

#[derive(Debug)]
enum ControllerCommand {
    SentinelVisible(bool),
}

#[derive(Debug)]
struct FetchSettled {
    generation: u64,
    outcome: Result<ProductPage, SearchApiError>,
}

/// The actor driving paginated search fetches.
pub struct SearchController {
    commands: mpsc::Receiver<ControllerCommand>,
    settlements: mpsc::Receiver<FetchSettled>,
    settlement_tx: mpsc::Sender<FetchSettled>,
    routes: watch::Receiver<Route>,
    service: Arc<dyn ProductSearchService>,
    results: watch::Sender<SearchResults>,
    generation: u64,
    cancel: CancellationToken,
    state: SessionState,
    query: String,
    items: Vec<Product>,
    total: u32,
    has_more: bool,
    error: Option<Arc<SearchApiError>>,
    sentinel_visible: bool,
}

/// Cheaply cloneable handle for feeding the sentinel signal and reading
/// results.
#[derive(Clone)]
pub struct SearchControllerHandle {
    commands: mpsc::Sender<ControllerCommand>,
    results: watch::Receiver<SearchResults>,
}

impl SearchController {
    /// Creates the controller and its handle.
    pub fn new(
        routes: watch::Receiver<Route>,
        service: Arc<dyn ProductSearchService>,
    ) -> (Self, SearchControllerHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (settlement_tx, settlement_rx) = mpsc::channel(SETTLEMENT_BUFFER);
        let (results_tx, results_rx) = watch::channel(SearchResults::default());

        let controller = Self {
            commands: command_rx,
            settlements: settlement_rx,
            settlement_tx,
            routes,
            service,
            results: results_tx,
            generation: 0,
            cancel: CancellationToken::new(),
            state: SessionState::Idle,
            query: String::new(),
            items: Vec::new(),
            total: 0,
            has_more: false,
            error: None,
            sentinel_visible: false,
        };
        let handle = SearchControllerHandle {
            commands: command_tx,
            results: results_rx,
        };
        (controller, handle)
    }

    /// Runs the controller's event loop until the handle is dropped or the
    /// route state goes away.
    pub async fn run(mut self) {
        info!("Search controller started");

        // Apply whatever location the system started on, so a session begins
        // immediately when launched straight onto the search page.
        let initial = self.routes.borrow_and_update().search_query();
        if !initial.is_empty() {
            self.start_session(initial);
        }

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(ControllerCommand::SentinelVisible(visible)) => {
                        self.on_sentinel(visible);
                    }
                    None => break,
                },
                Some(settled) = self.settlements.recv() => {
                    self.on_fetch_settled(settled);
                }
                changed = self.routes.changed() => match changed {
                    Ok(()) => self.on_route_changed(),
                    Err(_) => break,
                },
            }
        }

        // Nothing will consume late settlements; stop the fetch tasks too.
        self.cancel.cancel();
        info!("Search controller shutdown");
    }

    fn on_route_changed(&mut self) {
        let query = {
            let route = self.routes.borrow_and_update();
            route.search_query()
        };
        // Same effective query (e.g. a redundant navigation): the session
        // stands, nothing is refetched.
        if query != self.query {
            self.start_session(query);
        }
    }

    /// Discard the current session and begin one for `query`. An empty query
    /// means "no search here" and parks the controller in `Idle`.
    fn start_session(&mut self, query: String) {
        self.generation += 1;
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.items.clear();
        self.total = 0;
        self.has_more = false;
        self.error = None;
        self.query = query;

        if self.query.is_empty() {
            debug!(generation = self.generation, "Search session cleared");
            self.state = SessionState::Idle;
        } else {
            info!(query = %self.query, generation = self.generation, "New search session");
            self.state = SessionState::LoadingFirst;
            self.spawn_fetch(0);
        }
        self.publish();
    }

    /// Spawns one page fetch, tagged with the current generation and wired
    /// back to the settlement channel.
    fn spawn_fetch(&self, skip: u32) {
        let service = Arc::clone(&self.service);
        let settlements = self.settlement_tx.clone();
        let cancel = self.cancel.clone();
        let generation = self.generation;
        let query = self.query.clone();

        debug!(query = %query, skip, generation, "Requesting page");
        tokio::spawn(async move {
            let outcome = service.search(&query, skip, cancel).await;
            let _ = settlements.send(FetchSettled { generation, outcome }).await;
        });
    }

    fn on_fetch_settled(&mut self, settled: FetchSettled) {
        if settled.generation != self.generation {
            debug!(
                generation = settled.generation,
                current = self.generation,
                "Discarding stale settlement"
            );
            return;
        }

        match settled.outcome {
            Ok(page) => {
                if self.state == SessionState::LoadingFirst {
                    self.total = page.total;
                }
                self.items.extend(page.products);
                self.has_more = (self.items.len() as u32) < page.total;
                self.state = SessionState::Ready;
                debug!(
                    query = %self.query,
                    items = self.items.len(),
                    total = page.total,
                    has_more = self.has_more,
                    "Page applied"
                );
            }
            // A cancelled fetch may still settle as aborted; never surface it.
            Err(SearchApiError::Aborted) => {
                debug!("Discarding aborted settlement");
                return;
            }
            Err(error) => {
                warn!(query = %self.query, error = %error, "Search fetch failed");
                self.error = Some(Arc::new(error));
                self.state = SessionState::Failed;
            }
        }
        self.publish();
    }

    fn on_sentinel(&mut self, visible: bool) {
        let entered_view = visible && !self.sentinel_visible;
        self.sentinel_visible = visible;
        if entered_view {
            self.on_near_end();
        }
    }

    fn on_near_end(&mut self) {
        if self.state != SessionState::Ready || !self.has_more {
            debug!(state = ?self.state, has_more = self.has_more, "Near-end signal ignored");
            return;
        }
        self.state = SessionState::LoadingNext;
        self.publish();
        self.spawn_fetch(self.items.len() as u32);
    }

    fn publish(&self) {
        self.results.send_replace(SearchResults {
            query: self.query.clone(),
            items: self.items.clone(),
            total: self.total,
            is_loading_first: self.state == SessionState::LoadingFirst,
            is_loading_next: self.state == SessionState::LoadingNext,
            has_more: self.has_more,
            error: self.error.clone(),
        });
    }
}

impl SearchControllerHandle {
    /// Reports the sentinel element's visibility. Only the transition into
    /// view can trigger a next-page fetch.
    pub async fn sentinel_visible(&self, visible: bool) {
        let _ = self
            .commands
            .send(ControllerCommand::SentinelVisible(visible))
            .await;
    }

    /// The current results snapshot.
    pub fn results(&self) -> SearchResults {
        self.results.borrow().clone()
    }

    /// Subscribe to results changes.
    pub fn watch_results(&self) -> watch::Receiver<SearchResults> {
        self.results.clone()
    }
}
