//! # Product Search Service
//!
//! The seam between the browsing pipeline and the remote catalog API. The
//! rest of the system only ever talks to the [`ProductSearchService`] trait;
//! the [`http`] module implements it over the real wire, and [`mock`]
//! provides in-memory test doubles with the same contract.
//!
//! # Cancellation
//! Every call carries a [`CancellationToken`]. Callers cancel the token when
//! the request is superseded; an implementation must then settle with
//! [`SearchApiError::Aborted`] instead of leaving the future dangling.
//! Cancellation may race a slow settlement, so callers must not rely on it
//! alone to reject stale results.

pub mod http;
pub mod mock;

pub use http::HttpProductSearch;

use crate::model::ProductPage;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Field selection requested from the API for catalog listings.
pub const SELECT_FIELDS: &str =
    "id,title,brand,sku,price,rating,reviews,description,images,stock";

/// Page size for search results.
pub const PAGE_SIZE: u32 = 10;

/// Number of products in the landing-page feed.
pub const FEED_LIMIT: u32 = 30;

/// Errors produced by a product search backend.
#[derive(Debug, thiserror::Error)]
pub enum SearchApiError {
    /// The transport reported a non-success status.
    #[error("search request failed with status {status}")]
    RequestFailed { status: u16 },
    /// The transport itself failed (connection, decode, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The cancellation token fired before the request settled.
    #[error("request aborted")]
    Aborted,
}

/// A backend serving pages of catalog products.
#[async_trait]
pub trait ProductSearchService: Send + Sync + 'static {
    /// Fetch one page of products matching `query`, starting `skip` items
    /// into the result set.
    async fn search(
        &self,
        query: &str,
        skip: u32,
        cancel: CancellationToken,
    ) -> Result<ProductPage, SearchApiError>;

    /// Fetch the landing-page product feed.
    async fn fetch_all(&self, cancel: CancellationToken) -> Result<ProductPage, SearchApiError>;
}
