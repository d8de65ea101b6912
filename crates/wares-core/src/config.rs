// ── Dashboard configuration ──
//
// Describes *which* product service to talk to and how the dashboard
// pages through it. Built by the embedding application and handed to
// `Dashboard::new`; core never reads config files.

use wares_api::TransportConfig;

use crate::cache::CachePolicy;

/// Configuration for one dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Product service base URL (e.g. `https://dummyjson.com`).
    pub base_url: String,
    /// Rows per listing page.
    pub page_size: u32,
    /// Artificial response delay in milliseconds, passed through to the
    /// service to exercise slow-network UI states. `None` in production.
    pub delay_hint: Option<u64>,
    /// HTTP transport tuning.
    pub transport: TransportConfig,
    /// Cache freshness windows.
    pub cache: CachePolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dummyjson.com".into(),
            page_size: 10,
            delay_hint: None,
            transport: TransportConfig::default(),
            cache: CachePolicy::default(),
        }
    }
}
