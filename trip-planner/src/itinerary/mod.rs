//! Post-processing of planner-produced itineraries.
//!
//! The external planner's output is untrusted: it is validated against
//! the known stops and trip window, and its finish time is always
//! recomputed here. An invalid itinerary is still returned so the caller
//! can decide whether to salvage it.

mod finish;
mod validate;

use tracing::{info, warn};

use crate::domain::{GeoPoint, ItineraryItem, TimeWindow, ValidationVerdict};

pub use finish::{DEFAULT_STAY_MINS, recompute_finish_by};
pub use validate::{COORD_TOLERANCE, validate_itinerary};

/// Result of reviewing one itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanReview {
    pub verdict: ValidationVerdict,
    /// Recomputed finish time, "HH:MM". Set even when the verdict fails.
    pub finish_by: String,
    /// The itinerary with reasons clamped.
    pub itinerary: Vec<ItineraryItem>,
}

/// Clamp reasons, validate, and recompute the finish time.
pub fn review_itinerary(
    mut itinerary: Vec<ItineraryItem>,
    known_stops: &[GeoPoint],
    window: &TimeWindow,
    stay_mins: i64,
) -> PlanReview {
    for item in &mut itinerary {
        item.clamp_reason();
    }

    let verdict = validate_itinerary(&itinerary, known_stops, window);
    let finish_by = recompute_finish_by(&itinerary, stay_mins);

    if verdict.valid {
        info!(items = itinerary.len(), finish_by = %finish_by, "Itinerary accepted");
    } else {
        warn!(
            items = itinerary.len(),
            finish_by = %finish_by,
            reason = %verdict.message,
            "Itinerary failed validation, keeping it with recomputed finish time"
        );
    }

    PlanReview {
        verdict,
        finish_by,
        itinerary,
    }
}
