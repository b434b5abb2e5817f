//! HTTP implementation of the search service against the remote catalog API.

use crate::model::ProductPage;
use crate::service::{
    ProductSearchService, SearchApiError, FEED_LIMIT, PAGE_SIZE, SELECT_FIELDS,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Base URL of the public demo catalog API.
pub const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com/products";

/// [`ProductSearchService`] over HTTP.
///
/// Holds one [`reqwest::Client`] for its whole lifetime so connections are
/// pooled across page fetches.
pub struct HttpProductSearch {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProductSearch {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Issues one GET and decodes the page, settling early with `Aborted`
    /// if the token fires first.
    async fn get_page(
        &self,
        url: String,
        params: &[(&str, String)],
        cancel: CancellationToken,
    ) -> Result<ProductPage, SearchApiError> {
        let request = self.http.get(url).query(params).send();
        let response = tokio::select! {
            () = cancel.cancelled() => return Err(SearchApiError::Aborted),
            response = request => response?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SearchApiError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let page = tokio::select! {
            () = cancel.cancelled() => return Err(SearchApiError::Aborted),
            page = response.json::<ProductPage>() => page?,
        };
        Ok(page)
    }
}

#[async_trait]
impl ProductSearchService for HttpProductSearch {
    async fn search(
        &self,
        query: &str,
        skip: u32,
        cancel: CancellationToken,
    ) -> Result<ProductPage, SearchApiError> {
        debug!(query, skip, "Requesting search page");
        self.get_page(
            format!("{}/search", self.base_url),
            &[
                ("q", query.to_string()),
                ("select", SELECT_FIELDS.to_string()),
                ("limit", PAGE_SIZE.to_string()),
                ("skip", skip.to_string()),
            ],
            cancel,
        )
        .await
    }

    async fn fetch_all(&self, cancel: CancellationToken) -> Result<ProductPage, SearchApiError> {
        debug!("Requesting landing-page feed");
        self.get_page(
            self.base_url.clone(),
            &[
                ("select", SELECT_FIELDS.to_string()),
                ("limit", FEED_LIMIT.to_string()),
            ],
            cancel,
        )
        .await
    }
}
