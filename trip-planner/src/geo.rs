//! Great-circle distance and the straight-line ETA fallback.
//!
//! Used when the routing provider is unavailable. Less accurate than a
//! routed estimate (ignores roads and traffic) but always available.

use crate::domain::{EtaEstimate, GeoPoint, TravelMode};

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average walking speed.
const WALK_SPEED_KMH: f64 = 5.0;

/// Average driving speed.
const DRIVE_SPEED_KMH: f64 = 40.0;

/// Average speed for mixed-mode travel.
const MIX_SPEED_KMH: f64 = 25.0;

/// Assumed average speed for a travel mode, in km/h.
pub fn average_speed_kmh(mode: TravelMode) -> f64 {
    match mode {
        TravelMode::Walk => WALK_SPEED_KMH,
        TravelMode::Drive => DRIVE_SPEED_KMH,
        TravelMode::Mix => MIX_SPEED_KMH,
    }
}

/// Haversine distance between two points in kilometers.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.lat().to_radians();
    let lat2_rad = b.lat().to_radians();
    let delta_lat = (b.lat() - a.lat()).to_radians();
    let delta_lon = (b.lon() - a.lon()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimate travel time from straight-line distance and the mode's speed.
///
/// Never reports incidents; p80 is derived the same way as for routed
/// estimates.
pub fn fallback_eta(a: &GeoPoint, b: &GeoPoint, mode: TravelMode) -> EtaEstimate {
    let km = distance_km(a, b);
    let minutes = km / average_speed_kmh(mode) * 60.0;
    EtaEstimate::from_mean(minutes, 0)
}
