//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{EtaMatrix, GeoPoint, Incident, ItineraryItem, TravelMode};
use crate::itinerary::PlanReview;

/// Request to build the ETA matrix for a trip.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripEtaRequest {
    /// Trip origin
    pub start: GeoPoint,

    /// Stops to route to, in order
    #[serde(default)]
    pub stops: Vec<GeoPoint>,

    /// Window start, ISO-8601
    pub start_time: String,

    /// Window end, ISO-8601
    pub end_time: String,

    /// Travel mode (defaults to drive)
    #[serde(default)]
    pub mode: TravelMode,

    /// Bin spacing in minutes (defaults to the server setting)
    pub interval_minutes: Option<i64>,
}

/// ETA matrix and incidents for a trip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripEtaResponse {
    /// `"Start->{stop}"` → bin → estimate
    pub eta_matrix: EtaMatrix,

    /// Incidents around the trip area (empty if unavailable)
    pub incidents: Vec<Incident>,
}

/// Request to check a planner-produced itinerary.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryCheckRequest {
    pub itinerary: Vec<ItineraryItem>,

    /// Stops the itinerary was planned from
    #[serde(default)]
    pub known_stops: Vec<GeoPoint>,

    /// Window start, ISO-8601
    pub start_time: String,

    /// Window end, ISO-8601
    pub end_time: String,

    /// Minutes spent at each stop (defaults to the server setting)
    pub stay_minutes: Option<i64>,
}

/// Verdict, recomputed finish time, and the (possibly invalid) itinerary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryCheckResponse {
    pub valid: bool,

    /// Failure reason; empty when valid
    pub message: String,

    /// Finish time, "HH:MM"
    pub finish_by: String,

    pub itinerary: Vec<ItineraryItem>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl From<PlanReview> for ItineraryCheckResponse {
    fn from(review: PlanReview) -> Self {
        Self {
            valid: review.verdict.valid,
            message: review.verdict.message,
            finish_by: review.finish_by,
            itinerary: review.itinerary,
        }
    }
}
