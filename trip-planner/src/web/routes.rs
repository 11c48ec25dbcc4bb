//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};

use crate::domain::{DomainError, GeoPoint, TimeWindow};
use crate::eta::EtaMatrixBuilder;
use crate::itinerary::review_itinerary;
use crate::routing::incidents_best_effort;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trip/eta", post(trip_eta))
        .route("/trip/itinerary/check", post(check_itinerary))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Build the start→stop ETA matrix and fetch incidents for the trip area.
async fn trip_eta(
    State(state): State<AppState>,
    Json(req): Json<TripEtaRequest>,
) -> Result<Json<TripEtaResponse>, AppError> {
    let window = TimeWindow::parse(&req.start_time, &req.end_time)?;
    let interval = req
        .interval_minutes
        .unwrap_or(state.config.bin_interval_mins);

    info!(
        start = %req.start.name(),
        stops = req.stops.len(),
        mode = %req.mode,
        interval,
        trip_mins = window.duration_mins(),
        "Building trip ETAs"
    );

    let routing = state.routing.as_ref();
    let builder = EtaMatrixBuilder::new(
        routing,
        state.config.retry_policy(),
        state.config.max_concurrent,
    );
    let points: Vec<&GeoPoint> = std::iter::once(&req.start).chain(req.stops.iter()).collect();

    let (matrix, incidents) = tokio::join!(
        builder.build(&req.start, &req.stops, &window, req.mode, interval),
        incidents_best_effort(routing, &points, &window),
    );

    Ok(Json(TripEtaResponse {
        eta_matrix: matrix?,
        incidents,
    }))
}

/// Validate an itinerary and recompute its finish time.
///
/// Invalid itineraries are still returned with a recomputed finish time;
/// only a malformed window is rejected.
async fn check_itinerary(
    State(state): State<AppState>,
    Json(req): Json<ItineraryCheckRequest>,
) -> Result<Json<ItineraryCheckResponse>, AppError> {
    let window = TimeWindow::parse(&req.start_time, &req.end_time)?;
    let stay = req.stay_minutes.unwrap_or(state.config.stay_mins);
    if stay < 0 {
        return Err(AppError::BadRequest {
            message: format!("stay minutes must not be negative, got {stay}"),
        });
    }

    let review = review_itinerary(req.itinerary, &req.known_stops, &window, stay);
    Ok(Json(ItineraryCheckResponse::from(review)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };

        warn!(status = status.as_u16(), %message, "Request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
