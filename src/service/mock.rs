//! # Mock Search Services & Testing Guide
//!
//! Two in-memory stand-ins for the remote catalog API, with the same
//! [`ProductSearchService`] contract as the HTTP implementation.
//!
//! ## Which mock to use
//!
//! | Feature | [`create_mock_service`] | [`MockSearchService`] |
//! |---------|-------------------------|-----------------------|
//! | **Control** | Test answers each request by hand | Queued expectations |
//! | **Timing** | Test chooses *when* a request settles | Settles immediately |
//! | **Use case** | Staleness/cancellation races | Straight-line flows |
//! | **Error injection** | Send any `Err` on the responder | `return_err` |
//!
//! The channel-backed service is the sharper tool: the test receives each
//! [`ServiceRequest`] (query, skip, and the caller's cancellation token) and
//! settles it whenever it likes, which is exactly what staleness tests need —
//! change the query first, answer the superseded request second, and assert
//! nothing moved.
//!
//! ```ignore
//! let (service, mut requests) = create_mock_service(8);
//! // ... hand `service` to the component under test ...
//! let (query, skip, _cancel, respond_to) = expect_search(&mut requests).await.unwrap();
//! assert_eq!((query.as_str(), skip), ("phone", 0));
//! respond_to.send(Ok(page)).unwrap();
//! ```
//!
//! The fluent mock reads like a script and panics on any mismatch:
//!
//! ```ignore
//! let mut mock = MockSearchService::new();
//! mock.expect_search("phone", 0).return_ok(first_page);
//! mock.expect_search("phone", 10).return_err(SearchApiError::RequestFailed { status: 500 });
//! let service = mock.service();
//! // ... drive the system ...
//! mock.verify(); // all expectations consumed
//! ```

use crate::model::ProductPage;
use crate::service::{ProductSearchService, SearchApiError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// A request captured by the channel-backed mock service.
#[derive(Debug)]
pub enum ServiceRequest {
    Search {
        query: String,
        skip: u32,
        cancel: CancellationToken,
        respond_to: oneshot::Sender<Result<ProductPage, SearchApiError>>,
    },
    FetchAll {
        cancel: CancellationToken,
        respond_to: oneshot::Sender<Result<ProductPage, SearchApiError>>,
    },
}

/// [`ProductSearchService`] that forwards every call to a channel the test
/// controls.
///
/// The caller's cancellation token keeps its transport semantics: if it fires
/// while the test is still holding the responder, the call settles with
/// [`SearchApiError::Aborted`], just like an aborted wire request would.
#[derive(Clone)]
pub struct ChannelSearchService {
    sender: mpsc::Sender<ServiceRequest>,
}

/// Creates a mock service and a receiver for asserting requests.
pub fn create_mock_service(
    buffer_size: usize,
) -> (ChannelSearchService, mpsc::Receiver<ServiceRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelSearchService { sender }, receiver)
}

impl ChannelSearchService {
    async fn settle(
        &self,
        request: ServiceRequest,
        cancel: CancellationToken,
        response: oneshot::Receiver<Result<ProductPage, SearchApiError>>,
    ) -> Result<ProductPage, SearchApiError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| SearchApiError::Aborted)?;
        tokio::select! {
            () = cancel.cancelled() => Err(SearchApiError::Aborted),
            outcome = response => outcome.map_err(|_| SearchApiError::Aborted)?,
        }
    }
}

#[async_trait]
impl ProductSearchService for ChannelSearchService {
    async fn search(
        &self,
        query: &str,
        skip: u32,
        cancel: CancellationToken,
    ) -> Result<ProductPage, SearchApiError> {
        let (respond_to, response) = oneshot::channel();
        let request = ServiceRequest::Search {
            query: query.to_string(),
            skip,
            cancel: cancel.clone(),
            respond_to,
        };
        self.settle(request, cancel, response).await
    }

    async fn fetch_all(&self, cancel: CancellationToken) -> Result<ProductPage, SearchApiError> {
        let (respond_to, response) = oneshot::channel();
        let request = ServiceRequest::FetchAll {
            cancel: cancel.clone(),
            respond_to,
        };
        self.settle(request, cancel, response).await
    }
}

/// Helper to verify that the next captured request is a search.
pub async fn expect_search(
    receiver: &mut mpsc::Receiver<ServiceRequest>,
) -> Option<(
    String,
    u32,
    CancellationToken,
    oneshot::Sender<Result<ProductPage, SearchApiError>>,
)> {
    match receiver.recv().await {
        Some(ServiceRequest::Search {
            query,
            skip,
            cancel,
            respond_to,
        }) => Some((query, skip, cancel, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next captured request is a feed fetch.
pub async fn expect_fetch_all(
    receiver: &mut mpsc::Receiver<ServiceRequest>,
) -> Option<(
    CancellationToken,
    oneshot::Sender<Result<ProductPage, SearchApiError>>,
)> {
    match receiver.recv().await {
        Some(ServiceRequest::FetchAll { cancel, respond_to }) => Some((cancel, respond_to)),
        _ => None,
    }
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation {
    Search {
        query: String,
        skip: u32,
        response: Result<ProductPage, SearchApiError>,
    },
    FetchAll {
        response: Result<ProductPage, SearchApiError>,
    },
}

/// A mock service with expectation tracking for fluent testing.
pub struct MockSearchService {
    service: ChannelSearchService,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockSearchService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearchService {
    /// Creates a new mock service with no expectations.
    pub fn new() -> Self {
        let (service, mut receiver) = create_mock_service(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        // Background task answers each request from the expectation queue.
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        ServiceRequest::Search {
                            query,
                            skip,
                            respond_to,
                            ..
                        },
                        Some(Expectation::Search {
                            query: expected_query,
                            skip: expected_skip,
                            response,
                        }),
                    ) => {
                        if query != expected_query || skip != expected_skip {
                            panic!(
                                "Expected search ({expected_query:?}, skip {expected_skip}), \
                                 got ({query:?}, skip {skip})"
                            );
                        }
                        let _ = respond_to.send(response);
                    }
                    (
                        ServiceRequest::FetchAll { respond_to, .. },
                        Some(Expectation::FetchAll { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            service,
            expectations,
            _handle: handle,
        }
    }

    /// Returns the service for use in tests.
    pub fn service(&self) -> ChannelSearchService {
        self.service.clone()
    }

    /// Expects a `search` call with exactly this query and offset.
    pub fn expect_search(&mut self, query: impl Into<String>, skip: u32) -> SearchExpectationBuilder {
        SearchExpectationBuilder {
            query: query.into(),
            skip,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `fetch_all` call.
    pub fn expect_fetch_all(&mut self) -> FetchAllExpectationBuilder {
        FetchAllExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let expectations = self.expectations.lock().unwrap();
        if !expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                expectations.len()
            );
        }
    }
}

/// Builder for `search` expectations.
pub struct SearchExpectationBuilder {
    query: String,
    skip: u32,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl SearchExpectationBuilder {
    /// Sets the expectation to return a page.
    pub fn return_ok(self, page: ProductPage) {
        self.push(Ok(page));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: SearchApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<ProductPage, SearchApiError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Search {
                query: self.query,
                skip: self.skip,
                response,
            });
    }
}

/// Builder for `fetch_all` expectations.
pub struct FetchAllExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl FetchAllExpectationBuilder {
    /// Sets the expectation to return a page.
    pub fn return_ok(self, page: ProductPage) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::FetchAll { response: Ok(page) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: SearchApiError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::FetchAll {
                response: Err(error),
            });
    }
}
