//! Domain error types.
//!
//! These errors represent malformed inputs to the planning pipeline. They
//! are distinct from routing-provider and secret-store errors, which are
//! recovered where they occur.

/// Domain-level errors for validation of trip inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Time window is inverted, unparseable, or sampled with a bad interval.
    #[error("invalid time window: {0}")]
    InvalidWindow(String),

    /// A timestamp could not be parsed or placed on a date.
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    /// Latitude or longitude out of range, or not finite.
    #[error("invalid coordinates for '{name}': lat {lat}, lon {lon}")]
    InvalidCoordinate { name: String, lat: f64, lon: f64 },
}
