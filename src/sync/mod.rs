//! # Search Query Sync
//!
//! [`SearchQuerySync`] keeps a locally editable search string in agreement
//! with the `q` route parameter. The two directions are deliberately
//! asymmetric:
//!
//! - **Outward** (edits → route) is debounced: the local value updates as
//!   soon as the actor processes a [`SearchQueryHandle::set`], but navigation
//!   waits for a 300 ms quiet period and then fires once, with the last
//!   value set (trailing edge only, no maximum-wait cap).
//! - **Inward** (route → local value) is synchronous: a route change that did
//!   not originate here (e.g. history navigation) overwrites the local value
//!   immediately when it differs.
//!
//! Inward overwrites never arm the debounce timer — only direct `set` calls
//! do. Without that rule, absorbing our own navigation back from the route
//! would schedule another navigation, and the two sources of truth would chase
//! each other forever.
//!
//! When the timer fires, the trimmed local value decides the destination:
//! non-empty navigates to the search page with the trimmed query; empty
//! navigates home, but only when the search page is the current location;
//! empty anywhere else does nothing. The trim applies to navigation only —
//! the local value keeps whitespace exactly as typed. Redundant navigations
//! (same destination, same query) are issued without deduplication.

use crate::route::{normalize_query_value, NavigationRequest, Route, QUERY_PARAM, SEARCH_PATH};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Quiet period before an edited value is pushed to the route.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

const COMMAND_BUFFER: usize = 32;

#[derive(Debug)]
enum SyncCommand {
    Set(String),
}

/// The actor reconciling the local search value with the route.
pub struct SearchQuerySync {
    commands: mpsc::Receiver<SyncCommand>,
    routes: watch::Receiver<Route>,
    navigations: mpsc::Sender<NavigationRequest>,
    value: watch::Sender<String>,
}

/// Cheaply cloneable handle for editing and observing the search value.
#[derive(Clone)]
pub struct SearchQueryHandle {
    commands: mpsc::Sender<SyncCommand>,
    value: watch::Receiver<String>,
}

impl SearchQuerySync {
    /// Creates the sync actor and its handle, seeding the local value from
    /// the current route's `q` parameter.
    pub fn new(
        routes: watch::Receiver<Route>,
        navigations: mpsc::Sender<NavigationRequest>,
    ) -> (Self, SearchQueryHandle) {
        let initial = normalize_query_value(routes.borrow().param(QUERY_PARAM));
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (value_tx, value_rx) = watch::channel(initial);

        let sync = Self {
            commands: command_rx,
            routes,
            navigations,
            value: value_tx,
        };
        let handle = SearchQueryHandle {
            commands: command_tx,
            value: value_rx,
        };
        (sync, handle)
    }

    /// Runs the sync event loop until the handle is dropped or the route
    /// state goes away. A pending debounce is discarded on shutdown.
    pub async fn run(mut self) {
        info!("Search query sync started");

        // Delay-and-replace: one timer, re-armed on every edit. The `armed`
        // flag gates the branch so an expired-but-unarmed timer never fires.
        let debounce = sleep(DEBOUNCE);
        tokio::pin!(debounce);
        let mut armed = false;

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(SyncCommand::Set(value)) => {
                        debug!(value = %value, "Local value set");
                        self.value.send_replace(value);
                        debounce.as_mut().reset(Instant::now() + DEBOUNCE);
                        armed = true;
                    }
                    None => break,
                },
                () = &mut debounce, if armed => {
                    armed = false;
                    self.reconcile().await;
                }
                changed = self.routes.changed() => match changed {
                    Ok(()) => self.absorb_route_change(),
                    Err(_) => break,
                },
            }
        }

        info!("Search query sync shutdown");
    }

    /// One settled debounce window: decide the destination from the trimmed
    /// local value and issue at most one navigation.
    async fn reconcile(&self) {
        let value = self.value.borrow().clone();
        let trimmed = value.trim();
        let on_search = self.routes.borrow().path == SEARCH_PATH;

        if !trimmed.is_empty() {
            debug!(query = trimmed, "Debounce settled, navigating to search");
            let _ = self
                .navigations
                .send(NavigationRequest::search(trimmed))
                .await;
        } else if on_search {
            debug!("Debounce settled empty on search, navigating home");
            let _ = self.navigations.send(NavigationRequest::home()).await;
        } else {
            debug!("Debounce settled empty, nothing to do");
        }
    }

    /// Absorb a route change that did not come through `set`: overwrite the
    /// local value when the normalized parameter differs. Never arms the
    /// debounce.
    fn absorb_route_change(&mut self) {
        let next = {
            let route = self.routes.borrow_and_update();
            normalize_query_value(route.param(QUERY_PARAM))
        };
        let differs = next != *self.value.borrow();
        if differs {
            debug!(value = %next, "Route query changed externally, overwriting local value");
            self.value.send_replace(next);
        }
    }
}

impl SearchQueryHandle {
    /// Updates the local search value. The value is visible to observers as
    /// soon as the actor processes the command; the route follows after the
    /// debounce window settles.
    pub async fn set(&self, value: impl Into<String>) {
        let _ = self.commands.send(SyncCommand::Set(value.into())).await;
    }

    /// The current local value.
    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    /// Subscribe to local value changes.
    pub fn values(&self) -> watch::Receiver<String> {
        self.value.clone()
    }
}
