//! # Catalog Browser
//!
//! > **A product catalog browsing engine built on message-passing actors.**
//!
//! This crate implements the client side of a product catalog: a landing-page
//! feed, a debounced search box kept in sync with the URL, and infinite-scroll
//! search results fetched page by page from a remote product API.
//!
//! ## 🏗️ Design Philosophy
//!
//! A browser UI runs everything — timer callbacks, network settlements,
//! visibility events — interleaved on a single event loop. We get the same
//! guarantees from the **Actor Model**: each stateful component is a Tokio
//! task that owns its state outright and processes messages sequentially, so
//! there is not a single lock in this crate.
//!
//! Reactive state maps onto `tokio::sync::watch` channels (a value holder
//! with change notification), commands onto `mpsc` channels, and request
//! cancellation onto `tokio_util`'s `CancellationToken`.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Location ([`route`])
//! The [`Route`](route::Route) model, the query-value normalization rule,
//! and the [`Router`](route::Router) actor that owns the current location
//! and applies fire-and-forget navigation requests.
//!
//! ### 2. The Search Box ([`sync`])
//! [`SearchQuerySync`](sync::SearchQuerySync) reconciles the locally edited
//! search string with the route's `q` parameter: edits are visible
//! immediately, navigation follows after a 300 ms quiet period, and external
//! route changes flow back into the local value without re-triggering
//! navigation.
//!
//! ### 3. The Results ([`controller`])
//! [`SearchController`](controller::SearchController) runs one session per
//! query: it fetches pages, accumulates items, answers the sentinel's
//! "near end of list" signal, and discards settlements from superseded
//! queries by generation.
//!
//! ### 4. The Backend Seam ([`service`])
//! The [`ProductSearchService`](service::ProductSearchService) trait, its
//! HTTP implementation, and in-memory mocks for testing.
//!
//! ### 5. The Conductor ([`lifecycle`])
//! [`CatalogSystem`](lifecycle::CatalogSystem) wires the actors together,
//! spawns them, and shuts them down cleanly. Also home of
//! [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ## 🚀 Quick Start
//!
//! ### Running the Demo
//!
//! ```bash
//! # Run with info logs
//! RUST_LOG=info cargo run
//!
//! # Point at a different API
//! PRODUCTS_API_URL=http://localhost:3000/products cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```
//!
//! ## 🧪 Testing
//!
//! All debounce and pagination timing is tested under Tokio's paused clock,
//! so the suite runs in milliseconds with zero flakiness. See
//! [`service::mock`] for the two mock-service patterns and when to use each.

pub mod controller;
pub mod display;
pub mod lifecycle;
pub mod model;
pub mod route;
pub mod service;
pub mod sync;
