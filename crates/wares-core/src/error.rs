// ── Core error types ──
//
// User-facing errors from wares-core. Consumers never see reqwest or
// JSON parse failures directly; the `From<wares_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.
// `Clone` because deduplicated resolutions share one result, failures
// included.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach product service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// Client-side input rejected before any network call.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Product service error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wares_api::Error> for CoreError {
    fn from(err: wares_api::Error) -> Self {
        match err {
            wares_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            wares_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            wares_api::Error::Service {
                status: 404,
                message,
            } => CoreError::NotFound {
                identifier: message,
            },
            wares_api::Error::Service { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            wares_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}
