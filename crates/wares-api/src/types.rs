// Wire types for the product service.

use serde::{Deserialize, Serialize};

/// Category filter sentinel meaning "no filter".
///
/// The dashboard's category selector uses this value for its default
/// entry; [`ListQuery`] treats it the same as no category at all.
pub const CATEGORY_ALL: &str = "all";

/// A product record as returned by the service.
///
/// `id` is assigned server-side; it never exists before a successful
/// create. Fields only change through an explicit update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
}

/// One page of a product listing.
///
/// `total` is the number of matching records server-side, not the page
/// length.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
}

/// Body for `POST products/add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
}

/// Body for `PUT products/{id}`. The service expects the id in the body
/// as well as the path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductUpdate {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
}

/// Parameters of a cacheable list query.
///
/// Two queries with equal fields are the same request — this type is
/// the cache descriptor, so it derives value equality and `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    /// Page size.
    pub limit: u32,
    /// Records to skip (`page * limit`).
    pub skip: u64,
    /// Full-text search. Takes priority over `category` when non-empty.
    pub search: Option<String>,
    /// Category scope. `None` and [`CATEGORY_ALL`] both mean unfiltered.
    pub category: Option<String>,
    /// Artificial response delay in milliseconds, for exercising
    /// slow-network UI states against test deployments.
    pub delay: Option<u64>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            skip: 0,
            search: None,
            category: None,
            delay: None,
        }
    }
}

impl ListQuery {
    /// The effective search term: trimmed-empty searches count as absent.
    pub(crate) fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// The effective category scope: `None`, empty, and the
    /// [`CATEGORY_ALL`] sentinel all mean unfiltered.
    pub(crate) fn category_scope(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != CATEGORY_ALL)
    }
}
