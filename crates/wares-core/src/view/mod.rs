// ── Dashboard view state controller ──
//
// Owns UI-local state (page, filters, form, staged delete) and derives
// the query descriptor handed to the Coordinator. Renderers never poke
// at the controller's internals: they call `subscribe()` and pull
// `ViewState` snapshots from the watch channel, the same way consumers
// subscribe to any other reactive source in this workspace.

mod form;

pub use form::ProductDraft;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use wares_api::{CATEGORY_ALL, ListQuery, Product, ProductClient, ProductUpdate};

use crate::cache::QueryCache;
use crate::config::DashboardConfig;
use crate::coordinator::Coordinator;
use crate::error::CoreError;

/// Category names shipped with the dashboard, used when the service's
/// category list degrades to empty (its documented fails-open path).
pub const FALLBACK_CATEGORIES: &[&str] = &[
    "beauty",
    "fragrances",
    "furniture",
    "groceries",
    "home-decoration",
    "kitchen-accessories",
    "laptops",
    "mens-shirts",
    "mens-shoes",
    "mens-watches",
    "mobile-accessories",
    "motorcycle",
    "skin-care",
    "smartphones",
    "sports-accessories",
    "sunglasses",
    "tablets",
    "tops",
    "vehicle",
    "womens-bags",
    "womens-dresses",
    "womens-jewellery",
    "womens-shoes",
    "womens-watches",
];

fn pages_for(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size).max(1))
}

/// Snapshot of everything a renderer needs to draw the dashboard.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Zero-based page index.
    pub page: u64,
    /// Rows per page.
    pub page_size: u32,
    /// Raw search box contents.
    pub search: String,
    /// Selected category; [`CATEGORY_ALL`] means unfiltered.
    pub category: String,
    /// Total matching records server-side (not the page length).
    pub total: u64,
    /// The currently visible page of products.
    pub products: Arc<Vec<Product>>,
    /// Category names for the filter and form selectors.
    pub categories: Arc<Vec<String>>,
    /// A listing resolution is in flight.
    pub loading: bool,
    /// Last listing error, user-presentable. Retry is a user action.
    pub error: Option<String>,
    /// Open form draft, `None` when the form is closed.
    pub form: Option<ProductDraft>,
    /// Last form validation or submission error.
    pub form_error: Option<String>,
    /// The record being edited, `None` when creating.
    pub editing: Option<Product>,
    /// Delete staged for confirmation; the mutation only runs on confirm.
    pub pending_delete: Option<u64>,
}

impl ViewState {
    fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size,
            search: String::new(),
            category: CATEGORY_ALL.into(),
            total: 0,
            products: Arc::new(Vec::new()),
            categories: Arc::new(Vec::new()),
            loading: false,
            error: None,
            form: None,
            form_error: None,
            editing: None,
            pending_delete: None,
        }
    }

    /// `ceil(total / page_size)`; zero while nothing has loaded.
    pub fn total_pages(&self) -> u64 {
        pages_for(self.total, self.page_size)
    }

    /// Whether a search or category filter is active.
    pub fn has_filters(&self) -> bool {
        !self.search.trim().is_empty() || self.category != CATEGORY_ALL
    }

    pub fn form_open(&self) -> bool {
        self.form.is_some()
    }
}

/// The dashboard controller: translates user interaction into query
/// descriptors and owns page/filter/form state.
pub struct Dashboard {
    coordinator: Arc<Coordinator>,
    state: watch::Sender<ViewState>,
    delay_hint: Option<u64>,
}

impl Dashboard {
    /// Build a full stack (client, cache, coordinator) for one session.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let client = ProductClient::new(&config.base_url, &config.transport)?;
        let cache = Arc::new(QueryCache::new(config.cache));
        let coordinator = Arc::new(Coordinator::new(client, cache));
        Ok(Self::with_coordinator(
            coordinator,
            config.page_size,
            config.delay_hint,
        ))
    }

    /// Wrap an existing coordinator (shared cache, tests).
    pub fn with_coordinator(
        coordinator: Arc<Coordinator>,
        page_size: u32,
        delay_hint: Option<u64>,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::new(page_size));
        Self {
            coordinator,
            state,
            delay_hint,
        }
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Subscribe to state changes. Renderers await `changed()` and pull
    /// the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Point-in-time snapshot of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    // ── Filters & pagination ─────────────────────────────────────────

    /// Update the search text. Any change resets to the first page so
    /// the view cannot land on an out-of-range page after the result
    /// set shrinks.
    pub fn set_search(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|s| {
            if s.search == text {
                return false;
            }
            s.search = text;
            s.page = 0;
            true
        });
    }

    /// Update the category filter; resets to the first page on change.
    pub fn set_category(&self, category: impl Into<String>) {
        let category = category.into();
        self.state.send_if_modified(|s| {
            if s.category == category {
                return false;
            }
            s.category = category;
            s.page = 0;
            true
        });
    }

    /// Reset search, category, and page in one step (the empty-state
    /// "clear filters" affordance).
    pub fn clear_filters(&self) {
        self.state.send_if_modified(|s| {
            if !s.has_filters() && s.page == 0 {
                return false;
            }
            s.search.clear();
            s.category = CATEGORY_ALL.into();
            s.page = 0;
            true
        });
    }

    /// Advance one page. No-op on the last page or while loading.
    pub fn next_page(&self) {
        self.state.send_if_modified(|s| {
            if s.loading || s.total_pages() == 0 || s.page + 1 >= s.total_pages() {
                return false;
            }
            s.page += 1;
            true
        });
    }

    /// Go back one page. No-op on the first page or while loading.
    pub fn prev_page(&self) {
        self.state.send_if_modified(|s| {
            if s.loading || s.page == 0 {
                return false;
            }
            s.page -= 1;
            true
        });
    }

    /// The query descriptor derived from current view state:
    /// `skip = page * limit`, blank search omitted, the "all" sentinel
    /// mapped to no category, and the configured delay hint passed
    /// through.
    pub fn descriptor(&self) -> ListQuery {
        let s = self.state.borrow();
        ListQuery {
            limit: s.page_size,
            skip: s.page * u64::from(s.page_size),
            search: Some(s.search.trim().to_owned()).filter(|t| !t.is_empty()),
            category: Some(s.category.clone())
                .filter(|c| !c.is_empty() && c != CATEGORY_ALL),
            delay: self.delay_hint,
        }
    }

    // ── Listing resolution ───────────────────────────────────────────

    /// Resolve the current page through the coordinator and apply the
    /// result.
    ///
    /// A result for a descriptor that no longer matches current view
    /// state is discarded, never rendered. Errors leave prior data in
    /// place and are recorded for the renderer; retrying is another
    /// `refresh` call, never automatic.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let outcome = self.refresh_inner().await;
        self.state.send_modify(|s| s.loading = false);
        outcome
    }

    async fn refresh_inner(&self) -> Result<(), CoreError> {
        loop {
            let query = self.descriptor();
            match self.coordinator.products(&query).await {
                Ok(page) => {
                    if self.descriptor() != query {
                        debug!("discarding listing for superseded descriptor");
                        return Ok(());
                    }

                    let page_size = self.state.borrow().page_size;
                    let total_pages = pages_for(page.total, page_size);
                    let out_of_range = {
                        let s = self.state.borrow();
                        s.page > 0 && s.page >= total_pages.max(1)
                    };
                    if out_of_range {
                        // The result set shrank under us (e.g. the last row
                        // of the last page was deleted); clamp and re-resolve.
                        self.state
                            .send_modify(|s| s.page = total_pages.saturating_sub(1));
                        continue;
                    }

                    self.state.send_modify(|s| {
                        s.total = page.total;
                        s.products = Arc::new(page.products.clone());
                    });
                    return Ok(());
                }
                Err(err) => {
                    if self.descriptor() == query {
                        let message = err.to_string();
                        self.state.send_modify(|s| s.error = Some(message));
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Resolve the category list, falling back to the built-in set when
    /// the service degrades to empty or fails (the documented categories
    /// fallback; listings never swallow errors this way).
    pub async fn load_categories(&self) {
        let categories = match self.coordinator.categories().await {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => {
                debug!("service returned no categories; using fallback list");
                Arc::new(FALLBACK_CATEGORIES.iter().map(|&c| c.to_owned()).collect())
            }
            Err(err) => {
                warn!(error = %err, "failed to load categories; using fallback list");
                Arc::new(FALLBACK_CATEGORIES.iter().map(|&c| c.to_owned()).collect())
            }
        };
        self.state.send_modify(|s| s.categories = categories);
    }

    // ── Form flow ────────────────────────────────────────────────────

    /// Open the form: with a record for editing, or blank for creation.
    pub fn open_form(&self, product: Option<Product>) {
        self.state.send_modify(|s| {
            s.form_error = None;
            match product {
                Some(p) => {
                    s.form = Some(ProductDraft::from_product(&p));
                    s.editing = Some(p);
                }
                None => {
                    s.form = Some(ProductDraft::default());
                    s.editing = None;
                }
            }
        });
    }

    /// Close the form and clear editing state without submitting.
    pub fn close_form(&self) {
        self.state.send_modify(|s| {
            s.form = None;
            s.form_error = None;
            s.editing = None;
        });
    }

    /// Replace the draft with edited field values.
    pub fn set_draft(&self, draft: ProductDraft) {
        self.state.send_modify(|s| {
            if s.form.is_some() {
                s.form = Some(draft);
            }
        });
    }

    /// Validate and submit the open form.
    ///
    /// Validation failures surface in `form_error` and block submission
    /// without contacting the network. On success the form closes,
    /// editing state clears, and the listing is explicitly re-resolved
    /// on top of the coordinator's namespace invalidation.
    pub async fn submit_form(&self) -> Result<Product, CoreError> {
        let (draft, editing_id) = {
            let s = self.state.borrow();
            match &s.form {
                Some(draft) => (draft.clone(), s.editing.as_ref().map(|p| p.id)),
                None => return Err(CoreError::Internal("no form is open".into())),
            }
        };

        let validated = match draft.validate() {
            Ok(v) => v,
            Err(err) => {
                let message = err.to_string();
                self.state.send_modify(|s| s.form_error = Some(message));
                return Err(err);
            }
        };

        let result = match editing_id {
            Some(id) => {
                let update = ProductUpdate {
                    id,
                    title: validated.title,
                    description: validated.description,
                    price: validated.price,
                    category: validated.category,
                    stock: validated.stock,
                };
                self.coordinator.update_product(&update).await
            }
            None => self.coordinator.create_product(&validated).await,
        };

        match result {
            Ok(product) => {
                self.state.send_modify(|s| {
                    s.form = None;
                    s.form_error = None;
                    s.editing = None;
                });
                // A refresh failure after a successful write is recorded
                // in `state.error`; the write itself still succeeded.
                let _ = self.refresh().await;
                Ok(product)
            }
            Err(err) => {
                let message = err.to_string();
                self.state.send_modify(|s| s.form_error = Some(message));
                Err(err)
            }
        }
    }

    // ── Delete flow ──────────────────────────────────────────────────

    /// Stage a delete; nothing touches the network until
    /// [`confirm_delete`](Self::confirm_delete).
    pub fn request_delete(&self, id: u64) {
        self.state.send_modify(|s| s.pending_delete = Some(id));
    }

    /// Abandon the staged delete.
    pub fn cancel_delete(&self) {
        self.state.send_modify(|s| s.pending_delete = None);
    }

    /// Run the staged delete. Returns `Ok(None)` when nothing is staged.
    pub async fn confirm_delete(&self) -> Result<Option<Product>, CoreError> {
        let Some(id) = self.state.borrow().pending_delete else {
            return Ok(None);
        };

        match self.coordinator.delete_product(id).await {
            Ok(deleted) => {
                self.state.send_modify(|s| s.pending_delete = None);
                let _ = self.refresh().await;
                Ok(Some(deleted))
            }
            Err(err) => {
                let message = err.to_string();
                self.state.send_modify(|s| {
                    s.pending_delete = None;
                    s.error = Some(message);
                });
                Err(err)
            }
        }
    }
}
