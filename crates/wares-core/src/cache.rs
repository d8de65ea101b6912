// ── Query result cache ──
//
// Explicitly owned, injectable store: constructed once per session and
// handed to the Coordinator, never ambient global state. Entries are
// keyed by descriptor value and leave the cache only through namespace
// invalidation or a same-key overwrite; there is no size-based eviction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use wares_api::ProductPage;

use crate::query::{Namespace, QueryKey};

/// Freshness windows per namespace.
///
/// Categories change far less often than stock or price, so they stay
/// fresh much longer than listings.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub product_list_ttl: Duration,
    pub categories_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            product_list_ttl: Duration::from_secs(5 * 60),
            categories_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl CachePolicy {
    fn ttl_for(&self, namespace: Namespace) -> Duration {
        match namespace {
            Namespace::ProductLists => self.product_list_ttl,
            Namespace::Categories => self.categories_ttl,
        }
    }
}

/// A cached query result. `Arc`-wrapped so deduplicated waiters and the
/// cache share one allocation.
#[derive(Debug, Clone)]
pub enum QueryValue {
    Products(Arc<ProductPage>),
    Categories(Arc<Vec<String>>),
}

struct CacheEntry {
    value: QueryValue,
    fetched_at: Instant,
}

/// Descriptor-keyed result store with per-namespace freshness windows.
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    policy: CachePolicy,
}

impl QueryCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            policy,
        }
    }

    // The cache is only touched from the single logical event loop, so
    // poisoning means a panic already tore the session down.
    fn locked(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.entries.lock().expect("cache lock poisoned")
    }

    /// Look up an entry that is still within its freshness window.
    pub fn get_fresh(&self, key: &QueryKey) -> Option<QueryValue> {
        let entries = self.locked();
        let entry = entries.get(key)?;
        let ttl = self.policy.ttl_for(key.namespace());
        (entry.fetched_at.elapsed() < ttl).then(|| entry.value.clone())
    }

    /// Look up an entry regardless of freshness. A stale value stays in
    /// place until a successful resolution supersedes it.
    pub fn get(&self, key: &QueryKey) -> Option<QueryValue> {
        self.locked().get(key).map(|e| e.value.clone())
    }

    /// Store a result, marking it fresh as of now. Overwrites any prior
    /// entry for the same key.
    pub fn put(&self, key: QueryKey, value: QueryValue) {
        self.locked().insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop every entry in a namespace, returning how many were removed.
    pub fn invalidate_namespace(&self, namespace: Namespace) -> usize {
        let mut entries = self.locked();
        let before = entries.len();
        entries.retain(|key, _| key.namespace() != namespace);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.locked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}
