//! # Router Actor
//!
//! The [`Router`] owns the current [`Route`] and is the only writer of it.
//! Components request navigations through a [`RouterHandle`] (fire-and-forget
//! messages over an mpsc channel) and observe the resulting location through
//! a watch channel, which plays the role of reactive route state: the current
//! value is always readable, and subscribers are notified on every change.
//!
//! **Concurrency model**: the router processes navigation requests
//! sequentially in its own task, so the route can never be observed
//! mid-update and no locking is needed.

use crate::route::{NavigationRequest, QueryValue, Route, QUERY_PARAM, SEARCH_PATH};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

const REQUEST_BUFFER: usize = 32;

/// The actor that owns the current location.
pub struct Router {
    requests: mpsc::Receiver<NavigationRequest>,
    state: watch::Sender<Route>,
}

/// Cheaply cloneable handle for requesting navigations and reading the
/// current location.
#[derive(Clone)]
pub struct RouterHandle {
    requests: mpsc::Sender<NavigationRequest>,
    state: watch::Receiver<Route>,
}

impl Router {
    /// Creates a router starting at `initial` and its associated handle.
    pub fn new(initial: Route) -> (Self, RouterHandle) {
        let (request_tx, request_rx) = mpsc::channel(REQUEST_BUFFER);
        let (state_tx, state_rx) = watch::channel(initial);
        let router = Self {
            requests: request_rx,
            state: state_tx,
        };
        let handle = RouterHandle {
            requests: request_tx,
            state: state_rx,
        };
        (router, handle)
    }

    /// Runs the router's event loop, processing navigation requests until
    /// every handle (and every cloned request sender) is dropped.
    pub async fn run(mut self) {
        info!("Router started");

        while let Some(request) = self.requests.recv().await {
            debug!(path = %request.path, "Navigation requested");
            let route = self.resolve(request);
            info!(path = %route.path, "Navigated");
            self.state.send_replace(route);
        }

        info!("Router shutdown");
    }

    /// Resolves a navigation request into the route to apply.
    ///
    /// The search page is only enterable with a usable query: a request for
    /// the search path whose `q` parameter is absent or empty falls back to
    /// the landing page.
    fn resolve(&self, request: NavigationRequest) -> Route {
        if request.path == SEARCH_PATH
            && request
                .query
                .get(QUERY_PARAM)
                .map_or(true, |q| q.is_empty())
        {
            debug!("Search navigation without a query, redirecting home");
            return Route::home();
        }

        let query = request
            .query
            .into_iter()
            .map(|(name, value)| (name, QueryValue::Single(value)))
            .collect();
        Route {
            path: request.path,
            query,
        }
    }
}

impl RouterHandle {
    /// Requests a navigation. Fire-and-forget: delivery failures mean the
    /// router is gone, which only happens during shutdown.
    pub async fn navigate(&self, request: NavigationRequest) {
        let _ = self.requests.send(request).await;
    }

    /// The current location.
    pub fn current(&self) -> Route {
        self.state.borrow().clone()
    }

    /// Subscribe to location changes.
    pub fn routes(&self) -> watch::Receiver<Route> {
        self.state.clone()
    }

    /// A raw request sender, for wiring components that issue navigations
    /// of their own.
    pub fn requester(&self) -> mpsc::Sender<NavigationRequest> {
        self.requests.clone()
    }
}
