//! Travel-time estimation for trip planning.
//!
//! Answers "how long from the trip start to each stop, leaving at each
//! time bin?" by querying the routing provider, retrying transient
//! failures, and falling back to straight-line estimates when routing is
//! unavailable. The resulting matrix is consumed by the external planner.

mod matrix;
mod resolver;

pub use matrix::{DEFAULT_MAX_CONCURRENT, EtaMatrixBuilder};
pub use resolver::{RetryPolicy, RouteEtaResolver};
