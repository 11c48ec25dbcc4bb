//! Domain types for the trip planner.
//!
//! Points, clock times and windows enforce their invariants at
//! construction time, so code that receives them can trust their
//! validity. Itinerary items are the exception: they come from an
//! untrusted planner and are checked by the validator instead.

mod error;
mod eta;
mod geo;
mod itinerary;
mod time;

pub use error::DomainError;
pub use eta::{EtaEstimate, EtaMatrix, Incident, P80_FACTOR};
pub use geo::{BoundingBox, GeoPoint, TravelMode};
pub use itinerary::{ItineraryItem, MAX_REASON_CHARS, ValidationVerdict};
pub use time::{ClockTime, MINUTES_PER_DAY, TimeError, TimeWindow, parse_timestamp};
