//! Trip planning server.
//!
//! Builds time-binned travel-time matrices for a trip's stops, and checks
//! itineraries produced by an external planner against the known stops
//! and the trip window.

pub mod bins;
pub mod config;
pub mod domain;
pub mod eta;
pub mod geo;
pub mod itinerary;
pub mod routing;
pub mod secrets;
pub mod web;
