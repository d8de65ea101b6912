// Hand-crafted async HTTP client for the product service REST API.
//
// Endpoint routing for listings:
//   search set   -> GET products/search?q=...
//   category set -> GET products/category/{category}
//   otherwise    -> GET products
// Search wins when both are set.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::Error;
use crate::types::{ListQuery, NewProduct, Product, ProductPage, ProductUpdate};

// ── Error response shape from the product service ────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the product service.
///
/// Thin and stateless: owns URL construction, query-parameter encoding,
/// and response parsing. Caching and invalidation live in `wares-core`.
pub struct ProductClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ProductClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &crate::TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (useful for tests).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and guarantee a trailing slash so relative
    /// joins keep the full path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"products/search"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn delete_with_response<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Non-2xx is uniformly a `Service` error; the body is only mined
    /// for a human-readable message.
    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        Error::Service {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Listings ─────────────────────────────────────────────────────

    /// List products with pagination, search, or category scoping.
    ///
    /// `limit` and `skip` are always sent. A non-empty `search` routes to
    /// the search endpoint (with `q`) and takes priority over any
    /// category. The `delay` hint is appended only when > 0.
    pub async fn list_products(&self, query: &ListQuery) -> Result<ProductPage, Error> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("skip", query.skip.to_string()),
        ];

        let path = if let Some(term) = query.search_term() {
            params.push(("q", term.to_owned()));
            "products/search".to_owned()
        } else if let Some(category) = query.category_scope() {
            format!("products/category/{category}")
        } else {
            "products".to_owned()
        };

        if let Some(delay) = query.delay.filter(|d| *d > 0) {
            params.push(("delay", delay.to_string()));
        }

        self.get_with_params(&path, &params).await
    }

    /// List all category names.
    ///
    /// Fails open on shape: a non-array payload, or array entries that
    /// are not non-empty strings, degrade to an empty sequence rather
    /// than erroring. Callers apply their own fallback list. Transport
    /// and status failures still error.
    pub async fn list_categories(&self) -> Result<Vec<String>, Error> {
        let payload: serde_json::Value = self.get("products/categories").await?;

        let Some(items) = payload.as_array() else {
            warn!("categories response is not an array; returning empty list");
            return Ok(Vec::new());
        };

        Ok(items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a product. The service assigns the id.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, Error> {
        self.post("products/add", product).await
    }

    /// Update a product in place.
    pub async fn update_product(&self, product: &ProductUpdate) -> Result<Product, Error> {
        self.put(&format!("products/{}", product.id), product).await
    }

    /// Delete a product, returning the deleted record.
    pub async fn delete_product(&self, id: u64) -> Result<Product, Error> {
        self.delete_with_response(&format!("products/{id}")).await
    }
}
