//! Unit tests for the ETA matrix builder.

use super::*;
use crate::domain::parse_timestamp;
use crate::geo::fallback_eta;
use crate::routing::{RouteRequest, RouteSummary, RoutingError};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock route provider with fixed per-destination durations.
///
/// Destinations with no entry fail every call.
struct MockProvider {
    minutes: HashMap<String, f64>,
    calls: Mutex<Vec<(String, DateTime<FixedOffset>)>>,
}

impl MockProvider {
    fn new(minutes: &[(&str, f64)]) -> Self {
        Self {
            minutes: minutes
                .iter()
                .map(|(name, m)| (name.to_string(), *m))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn departures_for(&self, name: &str) -> Vec<DateTime<FixedOffset>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(dest, _)| dest == name)
            .map(|(_, dep)| *dep)
            .collect()
    }
}

impl RouteProvider for MockProvider {
    async fn route(&self, request: &RouteRequest<'_>) -> Result<RouteSummary, RoutingError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.destination.name().to_string(), request.departure));

        match self.minutes.get(request.destination.name()) {
            Some(m) => Ok(RouteSummary {
                duration_secs: m * 60.0,
                incidents: 0,
            }),
            None => Err(RoutingError::Api {
                status: 503,
                message: "unavailable".to_string(),
            }),
        }
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO)
}

fn start() -> GeoPoint {
    GeoPoint::new("Start", 37.7955, -122.3937).unwrap()
}

fn stop(name: &str, lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(name, lat, lon).unwrap()
}

fn window(start: &str, end: &str) -> TimeWindow {
    TimeWindow::parse(start, end).unwrap()
}

#[tokio::test]
async fn two_stops_three_bins() {
    let provider = MockProvider::new(&[("A", 10.0), ("B", 20.0)]);
    let builder = EtaMatrixBuilder::new(&provider, fast_policy(), DEFAULT_MAX_CONCURRENT);
    let stops = vec![stop("A", 37.80, -122.40), stop("B", 37.81, -122.41)];

    let matrix = builder
        .build(
            &start(),
            &stops,
            &window("2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z"),
            TravelMode::Drive,
            30,
        )
        .await
        .unwrap();

    assert_eq!(matrix.route_keys().collect::<Vec<_>>(), vec!["Start->A", "Start->B"]);
    for key in ["Start->A", "Start->B"] {
        let bins: Vec<&str> = matrix.route(key).unwrap().keys().map(String::as_str).collect();
        assert_eq!(bins, vec!["10:00", "10:30", "11:00"]);
    }
    assert_eq!(matrix.cell_count(), 6);
    assert_eq!(matrix.get("A", "10:30").unwrap().mean_minutes, 10.0);
    assert_eq!(matrix.get("B", "11:00").unwrap().mean_minutes, 20.0);
    assert_eq!(provider.call_count(), 6);
}

#[tokio::test]
async fn departures_anchor_to_window_date_and_offset() {
    let provider = MockProvider::new(&[("A", 5.0)]);
    let builder = EtaMatrixBuilder::new(&provider, fast_policy(), 2);

    builder
        .build(
            &start(),
            &[stop("A", 37.80, -122.40)],
            &window("2024-06-01T10:00:00-07:00", "2024-06-01T11:00:00-07:00"),
            TravelMode::Drive,
            30,
        )
        .await
        .unwrap();

    let mut departures = provider.departures_for("A");
    departures.sort();
    assert_eq!(
        departures,
        vec![
            parse_timestamp("2024-06-01T10:00:00-07:00").unwrap(),
            parse_timestamp("2024-06-01T10:30:00-07:00").unwrap(),
            parse_timestamp("2024-06-01T11:00:00-07:00").unwrap(),
        ]
    );
}

#[tokio::test]
async fn bins_after_midnight_depart_next_day() {
    let provider = MockProvider::new(&[("A", 5.0)]);
    let builder = EtaMatrixBuilder::new(&provider, fast_policy(), DEFAULT_MAX_CONCURRENT);

    let matrix = builder
        .build(
            &start(),
            &[stop("A", 37.80, -122.40)],
            &window("2024-06-01T23:30:00Z", "2024-06-02T00:30:00Z"),
            TravelMode::Drive,
            30,
        )
        .await
        .unwrap();

    assert_eq!(matrix.cell_count(), 3);
    let mut departures = provider.departures_for("A");
    departures.sort();
    assert_eq!(
        departures,
        vec![
            parse_timestamp("2024-06-01T23:30:00Z").unwrap(),
            parse_timestamp("2024-06-02T00:00:00Z").unwrap(),
            parse_timestamp("2024-06-02T00:30:00Z").unwrap(),
        ]
    );
}

#[tokio::test]
async fn failing_stop_uses_fallback_without_aborting() {
    let provider = MockProvider::new(&[("A", 10.0)]);
    let builder = EtaMatrixBuilder::new(&provider, fast_policy(), DEFAULT_MAX_CONCURRENT);
    let unreachable = stop("Museum", 37.80, -122.40);
    let stops = vec![stop("A", 37.80, -122.40), unreachable.clone()];

    let matrix = builder
        .build(
            &start(),
            &stops,
            &window("2024-06-01T10:00:00Z", "2024-06-01T10:30:00Z"),
            TravelMode::Walk,
            30,
        )
        .await
        .unwrap();

    assert_eq!(matrix.cell_count(), 4);
    let expected = fallback_eta(&start(), &unreachable, TravelMode::Walk);
    assert_eq!(matrix.get("Museum", "10:00"), Some(&expected));
    assert_eq!(matrix.get("Museum", "10:30"), Some(&expected));
    // 2 bins for A, 3 attempts for each Museum bin
    assert_eq!(provider.call_count(), 2 + 2 * 3);
}

#[tokio::test]
async fn unanchored_departure_stores_zeroed_cell() {
    let provider = MockProvider::new(&[("A", 10.0)]);
    let builder = EtaMatrixBuilder::new(&provider, fast_policy(), DEFAULT_MAX_CONCURRENT);
    let bad = Err(DomainError::InvalidTimestamp {
        value: "25:00".to_string(),
        reason: "hour out of range".to_string(),
    });

    let eta = builder
        .resolve_cell(&start(), &stop("A", 37.80, -122.40), &bad, TravelMode::Drive)
        .await;

    assert_eq!(eta, EtaEstimate::zeroed());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn no_stops_gives_empty_matrix() {
    let provider = MockProvider::new(&[]);
    let builder = EtaMatrixBuilder::new(&provider, fast_policy(), DEFAULT_MAX_CONCURRENT);

    let matrix = builder
        .build(
            &start(),
            &[],
            &window("2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z"),
            TravelMode::Drive,
            30,
        )
        .await
        .unwrap();

    assert!(matrix.is_empty());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn zero_interval_is_rejected() {
    let provider = MockProvider::new(&[("A", 10.0)]);
    let builder = EtaMatrixBuilder::new(&provider, fast_policy(), DEFAULT_MAX_CONCURRENT);

    let result = builder
        .build(
            &start(),
            &[stop("A", 37.80, -122.40)],
            &window("2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z"),
            TravelMode::Drive,
            0,
        )
        .await;

    assert!(matches!(result, Err(DomainError::InvalidWindow(_))));
}

#[tokio::test]
async fn day_long_window_is_rejected_before_routing() {
    let provider = MockProvider::new(&[("A", 10.0)]);
    let builder = EtaMatrixBuilder::new(&provider, fast_policy(), DEFAULT_MAX_CONCURRENT);

    let result = builder
        .build(
            &start(),
            &[stop("A", 37.80, -122.40)],
            &window("2024-06-01T10:00:00Z", "2024-06-02T11:00:00Z"),
            TravelMode::Drive,
            60,
        )
        .await;

    assert!(matches!(result, Err(DomainError::InvalidWindow(_))));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn zero_concurrency_treated_as_one() {
    let provider = MockProvider::new(&[("A", 10.0)]);
    let builder = EtaMatrixBuilder::new(&provider, fast_policy(), 0);

    let matrix = builder
        .build(
            &start(),
            &[stop("A", 37.80, -122.40)],
            &window("2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z"),
            TravelMode::Drive,
            30,
        )
        .await
        .unwrap();

    assert_eq!(matrix.cell_count(), 3);
}

proptest! {
    #[test]
    fn one_cell_per_stop_and_bin(
        stop_count in 0usize..5,
        span in 0i64..300,
        interval in 1i64..90,
        batch in 1usize..8,
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let names: Vec<String> = (0..stop_count).map(|i| format!("S{i}")).collect();
        let provider = MockProvider::new(
            &names.iter().map(|n| (n.as_str(), 7.0)).collect::<Vec<_>>(),
        );
        let stops: Vec<GeoPoint> = names
            .iter()
            .enumerate()
            .map(|(i, n)| stop(n, 37.7 + i as f64 * 0.01, -122.4))
            .collect();
        let start_at = parse_timestamp("2024-06-01T08:00:00Z").unwrap();
        let w = TimeWindow::new(start_at, start_at + chrono::Duration::minutes(span)).unwrap();

        let builder = EtaMatrixBuilder::new(&provider, fast_policy(), batch);
        let matrix = rt
            .block_on(builder.build(&start(), &stops, &w, TravelMode::Drive, interval))
            .unwrap();

        let bins = (span / interval + 1) as usize;
        prop_assert_eq!(matrix.cell_count(), stop_count * bins);
        for name in &names {
            prop_assert_eq!(matrix.route(&EtaMatrix::route_key(name)).map(|r| r.len()), Some(bins));
        }
    }
}
