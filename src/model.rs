//! # Catalog Data Model
//!
//! Plain data structures for products as served by the remote catalog API.
//! The search pipeline treats these as opaque cargo: it accumulates and
//! forwards them without inspecting display fields, and it assumes (but does
//! not verify) that product ids are unique across the pages of one query.

use serde::Deserialize;

/// A single product in the catalog.
///
/// The field set mirrors what the API returns for the display selection; only
/// `id`, `price`, `rating`, and `stock` are guaranteed to be present, the
/// rest default when the backend omits them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub rating: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub stock: u32,
}

impl Product {
    /// Creates a new Product instance with the display fields left empty.
    ///
    /// # Arguments
    /// * `id` - Unique identifier assigned by the backend
    /// * `title` - Product title
    /// * `price` - Product price
    /// * `stock` - Available stock quantity
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            brand: None,
            sku: None,
            category: None,
            description: String::new(),
            price,
            rating: 0.0,
            images: Vec::new(),
            stock,
        }
    }
}

/// One page of products, as returned by the catalog endpoints.
///
/// `products.len() <= limit`; `total` is the size of the full result set the
/// page was cut from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u32,
    pub skip: u32,
    pub limit: u32,
}
