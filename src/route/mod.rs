//! # Routes & Navigation
//!
//! This module defines the location model shared by the whole system: the
//! current [`Route`] (a path plus its query parameters), the
//! [`NavigationRequest`] message consumed by the [`router`], and
//! [`normalize_query_value`] for collapsing a raw query value into one
//! canonical string.
//!
//! # Architecture Note
//! Query parameters are modeled as they appear on the wire: a parameter may
//! carry a single value, several repeated values, or be absent entirely.
//! Everything downstream works on the normalized single-string form, so the
//! normalization rule lives here next to the types it interprets.

pub mod router;

pub use router::{Router, RouterHandle};

use std::collections::BTreeMap;

/// Path of the landing page.
pub const HOME_PATH: &str = "/";
/// Path of the search results page.
pub const SEARCH_PATH: &str = "/search";
/// Name of the search query parameter.
pub const QUERY_PARAM: &str = "q";

/// A raw query parameter value as it appears in a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// The parameter occurred once.
    Single(String),
    /// The parameter was repeated; values in order of occurrence.
    Many(Vec<String>),
}

/// Collapse a raw query parameter value into a single canonical string.
///
/// - A repeated parameter is reduced to its first value (or empty when the
///   repetition is itself empty)
/// - A single value passes through unchanged
/// - An absent parameter becomes the empty string
///
/// No trimming is applied; the function is pure and total.
pub fn normalize_query_value(value: Option<&QueryValue>) -> String {
    match value {
        Some(QueryValue::Single(value)) => value.clone(),
        Some(QueryValue::Many(values)) => values.first().cloned().unwrap_or_default(),
        None => String::new(),
    }
}

/// The current location: a path plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: BTreeMap<String, QueryValue>,
}

impl Route {
    /// The landing page location.
    pub fn home() -> Self {
        Self {
            path: HOME_PATH.to_string(),
            query: BTreeMap::new(),
        }
    }

    /// The search results location for `query`.
    pub fn search(query: impl Into<String>) -> Self {
        let mut params = BTreeMap::new();
        params.insert(QUERY_PARAM.to_string(), QueryValue::Single(query.into()));
        Self {
            path: SEARCH_PATH.to_string(),
            query: params,
        }
    }

    /// The raw value of a query parameter, if present.
    pub fn param(&self, name: &str) -> Option<&QueryValue> {
        self.query.get(name)
    }

    /// The effective search query at this location: the normalized `q`
    /// parameter on the search path, empty anywhere else.
    pub fn search_query(&self) -> String {
        if self.path == SEARCH_PATH {
            normalize_query_value(self.param(QUERY_PARAM))
        } else {
            String::new()
        }
    }
}

/// A fire-and-forget navigation message sent to the [`Router`].
///
/// Navigation requests carry single-valued parameters only; multi-valued
/// parameters enter the system from outside (e.g. a hand-edited URL), never
/// from our own navigations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub path: String,
    pub query: BTreeMap<String, String>,
}

impl NavigationRequest {
    /// Navigate to the landing page, dropping all query parameters.
    pub fn home() -> Self {
        Self {
            path: HOME_PATH.to_string(),
            query: BTreeMap::new(),
        }
    }

    /// Navigate to the search results page for `query`.
    pub fn search(query: impl Into<String>) -> Self {
        let mut params = BTreeMap::new();
        params.insert(QUERY_PARAM.to_string(), query.into());
        Self {
            path: SEARCH_PATH.to_string(),
            query: params,
        }
    }
}
