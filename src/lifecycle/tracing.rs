//! # Observability & Tracing
//!
//! This module provides the tracing infrastructure for the whole browsing
//! system.
//!
//! ## Overview
//!
//! The [`setup_tracing`] function initializes structured logging with the
//! `tracing` crate. Every actor logs its lifecycle at `info` and its
//! per-message handling at `debug`, with structured fields rather than
//! interpolated strings.
//!
//! ## Configuration
//!
//! The format is compact and hides the crate/module prefix
//! (`with_target(false)`); the actor logs carry enough structured context on
//! their own.
//!
//! - **Configurable log levels** via the `RUST_LOG` environment variable
//! - **Structured fields** (`query`, `skip`, `generation`, ...) on every line
//! - **Compact format** optimized for development
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: startup and shutdown of the router, query sync,
//!   and search controller
//! - **Navigation**: every requested and applied route
//! - **Search sessions**: session starts, page requests, applied pages,
//!   discarded stale settlements, failures
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Per-message actor logs
//! RUST_LOG=debug cargo run
//!
//! # Filter to specific modules
//! RUST_LOG=catalog_browser::controller=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! A debounced search settling and loading two pages, with `RUST_LOG=debug`:
//!
//! ```text
//! DEBUG Local value set value="phone"
//! DEBUG Debounce settled, navigating to search query="phone"
//! INFO Navigated path="/search"
//! INFO New search session query="phone" generation=1
//! DEBUG Requesting page query="phone" skip=0 generation=1
//! DEBUG Page applied query="phone" items=10 total=23 has_more=true
//! DEBUG Requesting page query="phone" skip=10 generation=1
//! DEBUG Page applied query="phone" items=20 total=23 has_more=true
//! ```
//!
//! Superseded work is visible too: changing the query mid-fetch logs a
//! `New search session` with a bumped `generation`, and the late settlement
//! shows up as `Discarding stale settlement`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - the fields carry the context
        .compact()
        .init();
}
