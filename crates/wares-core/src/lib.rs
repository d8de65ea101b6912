// wares-core: Data-coordination layer between wares-api and renderers.
//
// Three pieces, leaves first: the query cache (descriptor-keyed storage
// with freshness windows), the coordinator (request deduplication and
// post-mutation invalidation), and the dashboard view state controller
// (pagination, filters, form and delete flows) that renderers subscribe to.

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod query;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CachePolicy, QueryCache, QueryValue};
pub use config::DashboardConfig;
pub use coordinator::Coordinator;
pub use error::CoreError;
pub use query::{Namespace, QueryKey};
pub use view::{Dashboard, ProductDraft, ViewState};

// Re-export the wire types consumers handle directly.
pub use wares_api::{CATEGORY_ALL, ListQuery, NewProduct, Product, ProductPage, ProductUpdate};
