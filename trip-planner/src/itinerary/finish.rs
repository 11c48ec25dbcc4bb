//! Authoritative trip finish time.

use tracing::error;

use crate::domain::{ClockTime, ItineraryItem};

/// Default time spent at each stop.
pub const DEFAULT_STAY_MINS: i64 = 45;

/// Finish time of an itinerary: the last arrival plus `stay_mins`.
///
/// The result wraps at midnight and carries no date, so "23:50" plus 45
/// minutes is "00:35". An empty itinerary finishes at "00:00".
///
/// If the last arrival is missing or unparseable the failure is logged and
/// the raw arrival (or "00:00" when absent) is returned unchanged.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::ItineraryItem;
/// use trip_planner::itinerary::recompute_finish_by;
///
/// let items = vec![ItineraryItem::new("Pier", 37.8, -122.4, "09:00", "")];
/// assert_eq!(recompute_finish_by(&items, 45), "09:45");
/// ```
pub fn recompute_finish_by(itinerary: &[ItineraryItem], stay_mins: i64) -> String {
    let Some(last) = itinerary.last() else {
        return ClockTime::MIDNIGHT.to_string();
    };

    let Some(arrival) = last.arrival.as_deref() else {
        error!(spot = ?last.spot, "Failed to recompute finish time: last item has no arrival");
        return ClockTime::MIDNIGHT.to_string();
    };

    match ClockTime::parse_hhmm(arrival) {
        Ok(clock) => clock.wrapping_add_minutes(stay_mins).to_string(),
        Err(e) => {
            error!(arrival, error = %e, "Failed to recompute finish time");
            arrival.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(arrival: &str) -> ItineraryItem {
        ItineraryItem::new("Stop", 0.0, 0.0, arrival, "")
    }

    #[test]
    fn empty_is_midnight() {
        assert_eq!(recompute_finish_by(&[], DEFAULT_STAY_MINS), "00:00");
    }

    #[test]
    fn adds_stay_to_last_arrival() {
        assert_eq!(recompute_finish_by(&[item("09:00")], 45), "09:45");
        assert_eq!(
            recompute_finish_by(&[item("08:00"), item("10:20")], 45),
            "11:05"
        );
    }

    #[test]
    fn wraps_past_midnight() {
        assert_eq!(
            recompute_finish_by(&[item("22:00"), item("23:50")], 45),
            "00:35"
        );
    }

    #[test]
    fn uses_last_item_not_latest_time() {
        assert_eq!(
            recompute_finish_by(&[item("18:00"), item("10:00")], 30),
            "10:30"
        );
    }

    #[test]
    fn single_digit_hour_is_normalized() {
        assert_eq!(recompute_finish_by(&[item("9:05")], 0), "09:05");
    }

    #[test]
    fn unparseable_arrival_returned_unchanged() {
        assert_eq!(recompute_finish_by(&[item("late")], 45), "late");
    }

    #[test]
    fn missing_arrival_is_midnight() {
        let mut last = item("10:00");
        last.arrival = None;
        assert_eq!(recompute_finish_by(&[last], 45), "00:00");
    }

    #[test]
    fn huge_stay_does_not_overflow() {
        assert_eq!(recompute_finish_by(&[item("10:00")], i64::MAX), "04:07");
    }

    proptest! {
        #[test]
        fn matches_modular_arithmetic(minutes in 0u16..1440, stay in 0i64..3000) {
            let arrival = ClockTime::from_minutes(minutes).unwrap().to_string();
            let finish = recompute_finish_by(&[item(&arrival)], stay);

            let expected = (i64::from(minutes) + stay) % 1440;
            prop_assert_eq!(finish, format!("{:02}:{:02}", expected / 60, expected % 60));
        }
    }
}
