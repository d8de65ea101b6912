// ── Query keys ──
//
// Cacheable queries are keyed by value: two keys with equal fields are
// the same request. Keys group into namespaces so a mutation can
// invalidate every product listing in one sweep without touching the
// category list.

use wares_api::ListQuery;

/// Identity of a cacheable query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// One page of a product listing (plain, searched, or category-scoped).
    ProductList(ListQuery),
    /// The category-name list.
    Categories,
}

/// Logical grouping of cache entries, invalidated together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    ProductLists,
    Categories,
}

impl QueryKey {
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::ProductList(_) => Namespace::ProductLists,
            Self::Categories => Namespace::Categories,
        }
    }
}
