// ── Query/mutation coordinator ──
//
// Resolves queries against the cache before touching the network and
// guarantees at most one outbound call per distinct descriptor: the
// first resolver becomes the leader and fetches, later arrivals follow
// the leader's watch channel and share its result and its single cache
// write. Mutations are never coalesced; each one invalidates the
// product-listing namespace on success.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::debug;

use wares_api::{ListQuery, NewProduct, Product, ProductClient, ProductPage, ProductUpdate};

use crate::cache::{QueryCache, QueryValue};
use crate::error::CoreError;
use crate::query::{Namespace, QueryKey};

type QueryResult = Result<QueryValue, CoreError>;

enum Role {
    Leader(watch::Sender<Option<QueryResult>>),
    Follower(watch::Receiver<Option<QueryResult>>),
}

/// Coordinates cached reads and invalidating writes against the
/// product service.
pub struct Coordinator {
    client: ProductClient,
    cache: Arc<QueryCache>,
    inflight: Mutex<HashMap<QueryKey, watch::Receiver<Option<QueryResult>>>>,
}

impl Coordinator {
    pub fn new(client: ProductClient, cache: Arc<QueryCache>) -> Self {
        Self {
            client,
            cache,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// The injected cache store (shared, session-scoped).
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Resolve one page of a product listing, served from cache while
    /// fresh.
    pub async fn products(&self, query: &ListQuery) -> Result<Arc<ProductPage>, CoreError> {
        let key = QueryKey::ProductList(query.clone());
        let fetch = async {
            self.client
                .list_products(query)
                .await
                .map(|page| QueryValue::Products(Arc::new(page)))
                .map_err(CoreError::from)
        };

        match self.resolve(key, fetch).await? {
            QueryValue::Products(page) => Ok(page),
            QueryValue::Categories(_) => Err(CoreError::Internal(
                "category entry stored under a product-list key".into(),
            )),
        }
    }

    /// Resolve the category list, served from cache while fresh.
    pub async fn categories(&self) -> Result<Arc<Vec<String>>, CoreError> {
        let fetch = async {
            self.client
                .list_categories()
                .await
                .map(|list| QueryValue::Categories(Arc::new(list)))
                .map_err(CoreError::from)
        };

        match self.resolve(QueryKey::Categories, fetch).await? {
            QueryValue::Categories(list) => Ok(list),
            QueryValue::Products(_) => Err(CoreError::Internal(
                "product entry stored under the categories key".into(),
            )),
        }
    }

    /// Cache-or-fetch with in-flight deduplication.
    ///
    /// `fetch` is lazy: a follower drops it unpolled and awaits the
    /// leader's broadcast instead. Failures are not cached, so any
    /// previously stored value for the key stays in place.
    async fn resolve<Fut>(&self, key: QueryKey, fetch: Fut) -> QueryResult
    where
        Fut: Future<Output = QueryResult>,
    {
        if let Some(value) = self.cache.get_fresh(&key) {
            debug!(?key, "cache hit");
            return Ok(value);
        }

        let role = {
            let mut inflight = self.inflight.lock().await;
            // Re-check under the lock: the leader may have completed
            // between the freshness check and here.
            if let Some(value) = self.cache.get_fresh(&key) {
                return Ok(value);
            }
            if let Some(rx) = inflight.get(&key) {
                Role::Follower(rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                inflight.insert(key.clone(), rx);
                Role::Leader(tx)
            }
        };

        match role {
            Role::Follower(mut rx) => {
                debug!(?key, "joining in-flight request");
                loop {
                    if let Some(result) = rx.borrow_and_update().clone() {
                        return result;
                    }
                    if rx.changed().await.is_err() {
                        // Leader dropped without completing; clear the dead
                        // entry so the next resolution can fetch.
                        self.inflight.lock().await.remove(&key);
                        return Err(CoreError::Internal("in-flight query abandoned".into()));
                    }
                }
            }
            Role::Leader(tx) => {
                debug!(?key, "fetching");
                let result = fetch.await;
                if let Ok(value) = &result {
                    self.cache.put(key.clone(), value.clone());
                }
                self.inflight.lock().await.remove(&key);
                let _ = tx.send(Some(result.clone()));
                result
            }
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a product; on success every cached listing is invalidated
    /// so the next resolution re-fetches.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, CoreError> {
        let created = self.client.create_product(product).await?;
        self.invalidate_product_lists();
        Ok(created)
    }

    /// Update a product; invalidates listings on success.
    pub async fn update_product(&self, product: &ProductUpdate) -> Result<Product, CoreError> {
        let updated = self.client.update_product(product).await?;
        self.invalidate_product_lists();
        Ok(updated)
    }

    /// Delete a product; invalidates listings on success.
    pub async fn delete_product(&self, id: u64) -> Result<Product, CoreError> {
        let deleted = self.client.delete_product(id).await?;
        self.invalidate_product_lists();
        Ok(deleted)
    }

    /// On mutation failure the cache is untouched; this only runs after
    /// a confirmed success. Category entries are spared.
    fn invalidate_product_lists(&self) {
        let removed = self.cache.invalidate_namespace(Namespace::ProductLists);
        debug!(removed, "invalidated cached product listings after mutation");
    }
}
