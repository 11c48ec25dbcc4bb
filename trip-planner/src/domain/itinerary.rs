//! Planner-produced itinerary items and validation verdicts.

use serde::{Deserialize, Serialize};

/// Maximum length of an item's visit reason, in characters.
pub const MAX_REASON_CHARS: usize = 120;

/// One scheduled stop, as produced by the external planning capability.
///
/// Planner output is untrusted, so the four scheduling fields are optional
/// here and their presence is checked by the validator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItineraryItem {
    #[serde(default)]
    pub spot: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Local arrival time, "HH:MM".
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub reason: String,
}

impl ItineraryItem {
    /// Create a fully populated item.
    pub fn new(
        spot: impl Into<String>,
        lat: f64,
        lon: f64,
        arrival: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            spot: Some(spot.into()),
            lat: Some(lat),
            lon: Some(lon),
            arrival: Some(arrival.into()),
            reason: reason.into(),
        }
    }

    /// Truncate the reason to [`MAX_REASON_CHARS`] characters.
    pub fn clamp_reason(&mut self) {
        if let Some((idx, _)) = self.reason.char_indices().nth(MAX_REASON_CHARS) {
            self.reason.truncate(idx);
        }
    }
}

/// Outcome of itinerary validation. `message` is empty iff `valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    pub message: String,
}

impl ValidationVerdict {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}
