//! Application state for the web layer.

use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::domain::{BoundingBox, Incident, TimeWindow};
use crate::routing::{
    IncidentProvider, MockRoutingProvider, RouteProvider, RouteRequest, RouteSummary,
    RoutingClient, RoutingError,
};

/// Where routes and incidents come from.
pub enum RoutingBackend {
    /// The live routing API
    Live(RoutingClient),
    /// JSON fixtures, for offline development
    Mock(MockRoutingProvider),
}

impl RouteProvider for RoutingBackend {
    async fn route(&self, request: &RouteRequest<'_>) -> Result<RouteSummary, RoutingError> {
        match self {
            RoutingBackend::Live(client) => client.route(request).await,
            RoutingBackend::Mock(mock) => mock.route(request).await,
        }
    }
}

impl IncidentProvider for RoutingBackend {
    async fn incidents(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
    ) -> Result<Vec<Incident>, RoutingError> {
        match self {
            RoutingBackend::Live(client) => client.incidents(bbox, window).await,
            RoutingBackend::Mock(mock) => mock.incidents(bbox, window).await,
        }
    }
}

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Routing and incident source
    pub routing: Arc<RoutingBackend>,

    /// Planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(routing: RoutingBackend, config: PlannerConfig) -> Self {
        Self {
            routing: Arc::new(routing),
            config: Arc::new(config),
        }
    }
}
