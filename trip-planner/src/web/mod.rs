//! Web layer for the trip planner.
//!
//! Provides HTTP endpoints for building trip ETAs and checking
//! planner-produced itineraries.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, RoutingBackend};
