//! Time-bin generation for sampling travel times across a trip window.
//!
//! Bins are local "HH:MM" labels, one per interval step from the window
//! start up to and including the window end. Labels carry no date, so
//! mapping a bin back to a departure instant is a separate step.

use chrono::{DateTime, FixedOffset};

use crate::domain::{ClockTime, DomainError, MINUTES_PER_DAY, TimeWindow};

/// Default spacing between bins.
pub const DEFAULT_INTERVAL_MINS: i64 = 30;

/// Generate the bin labels for a window.
///
/// The first label is the start's clock time; further labels follow every
/// `interval_mins` while they do not pass the end. A bin exactly at the end
/// is included, so the sequence has `floor(span / interval) + 1` labels.
///
/// Labels carry no date, so a window spanning a full day or more would
/// repeat them and is rejected.
///
/// # Examples
///
/// ```
/// use trip_planner::bins::generate_bins;
/// use trip_planner::domain::TimeWindow;
///
/// let window = TimeWindow::parse("2024-06-01T10:00:00Z", "2024-06-01T11:00:00Z").unwrap();
/// assert_eq!(generate_bins(&window, 30).unwrap(), vec!["10:00", "10:30", "11:00"]);
/// ```
pub fn generate_bins(window: &TimeWindow, interval_mins: i64) -> Result<Vec<String>, DomainError> {
    Ok(generate_bin_times(window, interval_mins)?
        .into_iter()
        .map(|t| t.to_string())
        .collect())
}

/// Like [`generate_bins`], returning clock times instead of labels.
pub fn generate_bin_times(
    window: &TimeWindow,
    interval_mins: i64,
) -> Result<Vec<ClockTime>, DomainError> {
    if interval_mins <= 0 {
        return Err(DomainError::InvalidWindow(format!(
            "bin interval must be positive, got {interval_mins}"
        )));
    }

    // TimeWindow guarantees start <= end, so span is never negative.
    let span = window.duration_mins();
    if span >= i64::from(MINUTES_PER_DAY) {
        return Err(DomainError::InvalidWindow(format!(
            "window of {span} minutes would repeat bin labels; it must be shorter than a day"
        )));
    }
    let count = span / interval_mins + 1;

    let mut bins = Vec::with_capacity(count as usize);
    for step in 0..count {
        let instant = window.start_plus(step * interval_mins).ok_or_else(|| {
            DomainError::InvalidWindow("bin time overflows the calendar".to_string())
        })?;
        bins.push(ClockTime::of(&instant));
    }

    Ok(bins)
}

/// Map bin labels to departure instants.
///
/// Each label is placed on the window start's calendar date, in the
/// start's offset. When a label is earlier than its predecessor the
/// sequence has crossed midnight, and it and every later label roll over
/// to the following date.
///
/// Each entry fails independently, so one malformed label does not affect
/// the others.
pub fn bin_departures(
    window: &TimeWindow,
    labels: &[String],
) -> Vec<Result<DateTime<FixedOffset>, DomainError>> {
    let mut date = window.start_date();
    let mut prev: Option<ClockTime> = None;

    labels
        .iter()
        .map(|label| {
            let clock = ClockTime::parse_hhmm(label).map_err(|e| DomainError::InvalidTimestamp {
                value: label.clone(),
                reason: e.to_string(),
            })?;

            if prev.is_some_and(|p| clock < p) {
                date = date.succ_opt().ok_or_else(|| DomainError::InvalidTimestamp {
                    value: label.clone(),
                    reason: "date overflow".to_string(),
                })?;
            }
            prev = Some(clock);

            window.at(date, clock)
        })
        .collect()
}
