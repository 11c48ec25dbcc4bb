//! Plausibility checks for planner-produced itineraries.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

use crate::domain::{ClockTime, GeoPoint, ItineraryItem, TimeWindow, ValidationVerdict};

/// Maximum allowed difference between an item's coordinates and the
/// known stop's, in degrees.
pub const COORD_TOLERANCE: f64 = 1e-4;

/// Check an ordered itinerary against the known stops and the trip window.
///
/// Items are checked one at a time, and the first failure ends validation.
/// For each item the order is: required fields, coordinates, duplicate
/// spot, arrival inside the window, arrival not before the previous one.
///
/// Spots that are not known stops, and known stops that the itinerary
/// skips, are logged but do not fail validation.
pub fn validate_itinerary(
    itinerary: &[ItineraryItem],
    known_stops: &[GeoPoint],
    window: &TimeWindow,
) -> ValidationVerdict {
    if itinerary.is_empty() {
        return ValidationVerdict::fail("Itinerary is empty");
    }
    if known_stops.is_empty() {
        return ValidationVerdict::fail("No known stops to validate against");
    }

    let known: HashMap<&str, &GeoPoint> = known_stops.iter().map(|s| (s.name(), s)).collect();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut previous: Option<(DateTime<FixedOffset>, &str)> = None;

    for (i, item) in itinerary.iter().enumerate() {
        let (Some(spot), Some(lat), Some(lon), Some(arrival)) =
            (item.spot.as_deref(), item.lat, item.lon, item.arrival.as_deref())
        else {
            return ValidationVerdict::fail(format!("Itinerary item {i} missing required fields"));
        };

        match known.get(spot) {
            Some(stop) => {
                if (lat - stop.lat()).abs() > COORD_TOLERANCE {
                    return ValidationVerdict::fail(format!(
                        "Coordinates mismatch for '{spot}': lat {lat} != {}",
                        stop.lat()
                    ));
                }
                if (lon - stop.lon()).abs() > COORD_TOLERANCE {
                    return ValidationVerdict::fail(format!(
                        "Coordinates mismatch for '{spot}': lon {lon} != {}",
                        stop.lon()
                    ));
                }
            }
            None => warn!(spot, "Spot not in known stops"),
        }

        if !visited.insert(spot) {
            return ValidationVerdict::fail(format!("Duplicate stop in itinerary: '{spot}'"));
        }

        let arrival_at = match arrival_on_start_date(arrival, window) {
            Ok(at) => at,
            Err(reason) => {
                return ValidationVerdict::fail(format!(
                    "Invalid arrival time '{arrival}': {reason}"
                ));
            }
        };

        if !window.contains(&arrival_at) {
            return ValidationVerdict::fail(format!("Arrival time {arrival} outside time window"));
        }

        if let Some((prev_at, prev_label)) = previous {
            if arrival_at < prev_at {
                return ValidationVerdict::fail(format!(
                    "Arrival times not monotonic: {arrival} before previous {prev_label}"
                ));
            }
        }
        previous = Some((arrival_at, arrival));
    }

    let missing: BTreeSet<&str> = known
        .keys()
        .copied()
        .filter(|name| !visited.contains(name))
        .collect();
    if !missing.is_empty() {
        warn!(missing = ?missing, "Not all stops visited");
    }

    debug!(items = itinerary.len(), "Itinerary passed validation");
    ValidationVerdict::ok()
}

/// Place an "HH:MM" arrival on the window start's date. No midnight
/// rollover: an arrival after midnight lands before the start.
fn arrival_on_start_date(
    arrival: &str,
    window: &TimeWindow,
) -> Result<DateTime<FixedOffset>, String> {
    let clock = ClockTime::parse_hhmm(arrival).map_err(|e| e.to_string())?;
    window.on_start_date(clock).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window() -> TimeWindow {
        TimeWindow::parse("2024-06-01T17:00:00Z", "2024-06-01T19:00:00Z").unwrap()
    }

    fn known() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new("Pier", 37.8087, -122.4098).unwrap(),
            GeoPoint::new("Museum", 37.8005, -122.3987).unwrap(),
            GeoPoint::new("Tower", 37.8024, -122.4058).unwrap(),
        ]
    }

    fn pier(arrival: &str) -> ItineraryItem {
        ItineraryItem::new("Pier", 37.8087, -122.4098, arrival, "views")
    }

    fn museum(arrival: &str) -> ItineraryItem {
        ItineraryItem::new("Museum", 37.8005, -122.3987, arrival, "art")
    }

    fn assert_fails(verdict: ValidationVerdict, expected: &str) {
        assert!(!verdict.valid, "expected failure: {expected}");
        assert_eq!(verdict.message, expected);
    }

    #[test]
    fn pier_and_museum_within_window() {
        let itinerary = vec![pier("17:30"), museum("18:45")];
        assert_eq!(
            validate_itinerary(&itinerary, &known(), &window()),
            ValidationVerdict::ok()
        );
    }

    #[test]
    fn omitted_known_stops_still_valid() {
        let itinerary = vec![museum("17:15")];
        assert!(validate_itinerary(&itinerary, &known(), &window()).valid);
    }

    #[test]
    fn unknown_spot_is_not_fatal() {
        let itinerary = vec![
            pier("17:30"),
            ItineraryItem::new("Sunset Bench", 37.0, -122.0, "18:00", "rest"),
        ];
        assert!(validate_itinerary(&itinerary, &known(), &window()).valid);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let itinerary = vec![pier("17:00"), museum("19:00")];
        assert!(validate_itinerary(&itinerary, &known(), &window()).valid);
    }

    #[test]
    fn equal_arrivals_are_monotonic() {
        let itinerary = vec![pier("18:00"), museum("18:00")];
        assert!(validate_itinerary(&itinerary, &known(), &window()).valid);
    }

    #[test]
    fn empty_itinerary() {
        assert_fails(
            validate_itinerary(&[], &known(), &window()),
            "Itinerary is empty",
        );
    }

    #[test]
    fn no_known_stops() {
        assert_fails(
            validate_itinerary(&[pier("17:30")], &[], &window()),
            "No known stops to validate against",
        );
    }

    #[test]
    fn missing_fields_name_the_index() {
        let mut incomplete = museum("18:00");
        incomplete.lon = None;
        assert_fails(
            validate_itinerary(&[pier("17:30"), incomplete], &known(), &window()),
            "Itinerary item 1 missing required fields",
        );
    }

    #[test]
    fn lat_mismatch() {
        let item = ItineraryItem::new("Pier", 37.9, -122.4098, "17:30", "");
        assert_fails(
            validate_itinerary(&[item], &known(), &window()),
            "Coordinates mismatch for 'Pier': lat 37.9 != 37.8087",
        );
    }

    #[test]
    fn lon_mismatch() {
        let item = ItineraryItem::new("Pier", 37.8087, -122.5, "17:30", "");
        assert_fails(
            validate_itinerary(&[item], &known(), &window()),
            "Coordinates mismatch for 'Pier': lon -122.5 != -122.4098",
        );
    }

    #[test]
    fn within_tolerance_accepted() {
        let item = ItineraryItem::new("Pier", 37.80875, -122.40975, "17:30", "");
        assert!(validate_itinerary(&[item], &known(), &window()).valid);
    }

    #[test]
    fn duplicate_spot() {
        let itinerary = vec![pier("17:30"), museum("18:00"), pier("18:30")];
        assert_fails(
            validate_itinerary(&itinerary, &known(), &window()),
            "Duplicate stop in itinerary: 'Pier'",
        );
    }

    #[test]
    fn arrival_before_window() {
        assert_fails(
            validate_itinerary(&[pier("16:59")], &known(), &window()),
            "Arrival time 16:59 outside time window",
        );
    }

    #[test]
    fn arrival_after_window() {
        assert_fails(
            validate_itinerary(&[pier("19:01")], &known(), &window()),
            "Arrival time 19:01 outside time window",
        );
    }

    #[test]
    fn arrivals_out_of_order() {
        let itinerary = vec![pier("18:30"), museum("17:45")];
        assert_fails(
            validate_itinerary(&itinerary, &known(), &window()),
            "Arrival times not monotonic: 17:45 before previous 18:30",
        );
    }

    #[test]
    fn unparseable_arrival() {
        let verdict = validate_itinerary(&[pier("half past five")], &known(), &window());
        assert!(!verdict.valid);
        assert!(verdict.message.starts_with("Invalid arrival time 'half past five': "));
    }

    #[test]
    fn first_failing_item_wins() {
        // Item 0 is out of window; item 1 would fail the field check.
        let mut incomplete = museum("18:00");
        incomplete.spot = None;
        assert_fails(
            validate_itinerary(&[pier("20:00"), incomplete], &known(), &window()),
            "Arrival time 20:00 outside time window",
        );
    }

    #[test]
    fn after_midnight_arrival_is_outside_window() {
        let window = TimeWindow::parse("2024-06-01T22:00:00Z", "2024-06-02T02:00:00Z").unwrap();
        let verdict = validate_itinerary(&[pier("23:00"), museum("00:30")], &known(), &window);
        assert_eq!(verdict.message, "Arrival time 00:30 outside time window");
    }

    proptest! {
        #[test]
        fn sorted_in_window_itineraries_are_valid(
            mut offsets in proptest::collection::vec(0u16..=120, 1..4),
        ) {
            offsets.sort_unstable();
            let stops = known();
            let itinerary: Vec<ItineraryItem> = offsets
                .iter()
                .zip(stops.iter())
                .map(|(offset, stop)| {
                    let arrival = ClockTime::from_minutes(17 * 60 + offset).unwrap();
                    ItineraryItem::new(stop.name(), stop.lat(), stop.lon(), arrival.to_string(), "")
                })
                .collect();

            prop_assert!(validate_itinerary(&itinerary, &stops, &window()).valid);
        }
    }
}
