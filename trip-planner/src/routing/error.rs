//! Routing provider error types.

/// Errors from the routing and incident provider.
///
/// None of these escape the ETA resolver: every variant is a transport
/// failure that triggers a retry and then the straight-line fallback.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Provider answered but the route had no legs
    #[error("no route legs returned")]
    NoLegs,

    /// No API key in the secret store or the environment
    #[error("routing API key not found in secret store or environment")]
    MissingApiKey,
}
