//! Routing and incident provider client.
//!
//! Key characteristics of the provider:
//! - Every request needs a bearer token, resolved once from the secret
//!   store and then cached for the life of the process
//! - Route responses may contain several routes; only the first is used,
//!   and its leg durations are summed
//! - Incidents are advisory: a failed incident fetch never fails a caller

mod client;
mod error;
mod mock;
mod types;

use std::future::Future;

use chrono::{DateTime, FixedOffset};
use tracing::warn;

use crate::domain::{BoundingBox, GeoPoint, Incident, TimeWindow, TravelMode};

pub use client::{DEFAULT_BASE_URL, RoutingClient, RoutingConfig, provider_for};
pub use error::RoutingError;
pub use mock::MockRoutingProvider;
pub use types::{IncidentDto, IncidentsResponse, LegDuration, Route, RouteLeg, RouteResponse, RouteSummary};

/// One origin→destination routing query.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub origin: &'a GeoPoint,
    pub destination: &'a GeoPoint,
    pub departure: DateTime<FixedOffset>,
    pub mode: TravelMode,
}

/// Trait for providing routed travel times.
///
/// This abstraction allows the ETA resolver to be tested with mock data.
pub trait RouteProvider: Sync {
    /// Route one pair at a departure time. A single attempt, no retries.
    fn route(
        &self,
        request: &RouteRequest<'_>,
    ) -> impl Future<Output = Result<RouteSummary, RoutingError>> + Send;
}

/// Trait for providing traffic incidents.
pub trait IncidentProvider: Sync {
    fn incidents(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
    ) -> impl Future<Output = Result<Vec<Incident>, RoutingError>> + Send;
}

/// Fetch incidents around `points`, returning an empty list on any failure.
pub async fn incidents_best_effort<P: IncidentProvider>(
    provider: &P,
    points: &[&GeoPoint],
    window: &TimeWindow,
) -> Vec<Incident> {
    let Some(bbox) = BoundingBox::around(points.iter().copied()) else {
        return Vec::new();
    };

    match provider.incidents(&bbox, window).await {
        Ok(incidents) => incidents,
        Err(e) => {
            warn!(bbox = %bbox, error = %e, "Failed to fetch incidents, using empty list");
            Vec::new()
        }
    }
}
