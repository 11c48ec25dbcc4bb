//! Single-leg travel-time resolution with retry and fallback.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, error, warn};

use crate::domain::{EtaEstimate, GeoPoint, TravelMode};
use crate::geo::fallback_eta;
use crate::routing::{RouteProvider, RouteRequest, RoutingError};

/// Bounded retry schedule for routing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Progress of one resolution.
#[derive(Debug)]
enum ResolveState {
    /// About to make attempt `n` (1-based).
    Attempting(u32),
    /// Attempt `n` failed and another is allowed.
    Retrying { attempt: u32, error: RoutingError },
    /// Every attempt failed.
    Fallback { error: RoutingError },
}

/// Resolves origin→destination estimates through a [`RouteProvider`].
///
/// Resolution never fails: when the provider errors on every attempt the
/// great-circle estimate from [`fallback_eta`] is returned instead. A
/// response with no legs counts as a failed attempt.
pub struct RouteEtaResolver<'a, P> {
    provider: &'a P,
    policy: RetryPolicy,
}

impl<'a, P: RouteProvider> RouteEtaResolver<'a, P> {
    pub fn new(provider: &'a P, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Estimate travel time from `origin` to `dest` leaving at `departure`.
    pub async fn resolve(
        &self,
        origin: &GeoPoint,
        dest: &GeoPoint,
        departure: DateTime<FixedOffset>,
        mode: TravelMode,
    ) -> EtaEstimate {
        let request = RouteRequest {
            origin,
            destination: dest,
            departure,
            mode,
        };
        let max_attempts = self.policy.max_attempts.max(1);
        let mut state = ResolveState::Attempting(1);

        loop {
            state = match state {
                ResolveState::Attempting(attempt) => match self.provider.route(&request).await {
                    Ok(summary) => {
                        debug!(
                            origin = %origin.name(),
                            dest = %dest.name(),
                            attempt,
                            duration_secs = summary.duration_secs,
                            "Resolved route"
                        );
                        return summary.to_estimate();
                    }
                    Err(error) if attempt < max_attempts => {
                        ResolveState::Retrying { attempt, error }
                    }
                    Err(error) => ResolveState::Fallback { error },
                },
                ResolveState::Retrying { attempt, error } => {
                    warn!(
                        origin = %origin.name(),
                        dest = %dest.name(),
                        attempt,
                        max_attempts,
                        error = %error,
                        "Routing attempt failed, retrying"
                    );
                    tokio::time::sleep(self.policy.delay).await;
                    ResolveState::Attempting(attempt + 1)
                }
                ResolveState::Fallback { error } => {
                    error!(
                        origin = %origin.name(),
                        dest = %dest.name(),
                        attempts = max_attempts,
                        error = %error,
                        "Routing failed, using distance-based estimate"
                    );
                    return fallback_eta(origin, dest, mode);
                }
            };
        }
    }
}
