use crate::controller::{SearchController, SearchControllerHandle};
use crate::route::{Route, Router, RouterHandle};
use crate::service::ProductSearchService;
use crate::sync::{SearchQueryHandle, SearchQuerySync};
use std::sync::Arc;
use tracing::{error, info};

/// The runtime orchestrator for the catalog browsing system.
///
/// `CatalogSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping all actors in the system
/// - **Dependency Wiring**: connecting the query sync to the router's
///   navigation channel and both observers to the route watch
///
/// # Architecture
///
/// The system consists of three actors:
/// - **Router**: owns the current location, applies navigation requests
/// - **Search Query Sync**: debounces edits into navigations, absorbs
///   external route changes back into the local value
/// - **Search Controller**: fetches and accumulates result pages for the
///   route's current query
///
/// # Example
///
/// ```ignore
/// let service = Arc::new(HttpProductSearch::new(base_url));
/// let system = CatalogSystem::new(service);
///
/// system.search.set("phone").await;          // type into the search box
/// let results = system.results.results();    // read the current snapshot
///
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    /// Handle for requesting navigations and reading the current location.
    pub router: RouterHandle,

    /// Handle for editing and observing the search value.
    pub search: SearchQueryHandle,

    /// Handle for the sentinel signal and the results snapshot.
    pub results: SearchControllerHandle,

    /// Task handles for all running actors (used for graceful shutdown).
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CatalogSystem {
    /// Creates a system starting on the landing page.
    pub fn new(service: Arc<dyn ProductSearchService>) -> Self {
        Self::with_initial_route(service, Route::home())
    }

    /// Creates and starts a system at an arbitrary initial location, e.g. a
    /// deep link straight onto the search page.
    pub fn with_initial_route(service: Arc<dyn ProductSearchService>, initial: Route) -> Self {
        // 1. Router owns the location; everyone else observes it.
        let (router, router_handle) = Router::new(initial);

        // 2. Query sync issues navigations into the router's channel.
        let (sync, search_handle) =
            SearchQuerySync::new(router_handle.routes(), router_handle.requester());

        // 3. Controller follows the route and talks to the search backend.
        let (controller, results_handle) =
            SearchController::new(router_handle.routes(), service);

        // Spawn each actor in its own task.
        let handles = vec![
            tokio::spawn(router.run()),
            tokio::spawn(sync.run()),
            tokio::spawn(controller.run()),
        ];

        Self {
            router: router_handle,
            search: search_handle,
            results: results_handle,
            handles,
        }
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the handles closes the actors' command channels; each actor
    /// drains what it has and exits its event loop. The sync actor's pending
    /// debounce (if any) is discarded, and the controller cancels whatever
    /// fetches are still in flight on its way out.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all actors shut down cleanly
    /// - `Err(String)` if any actor task panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog system...");

        // Closing order matters: the sync actor holds a navigation sender
        // into the router, so it must exit before the router's channel can
        // close.
        drop(self.search);
        drop(self.results);
        drop(self.router);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Catalog system shutdown complete.");
        Ok(())
    }
}
