//! Mock routing provider for development without API access.
//!
//! Loads sample route responses from JSON files and serves them as if they
//! were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{BoundingBox, Incident, TimeWindow};

use super::error::RoutingError;
use super::types::{RouteResponse, RouteSummary};
use super::{IncidentProvider, RouteProvider, RouteRequest};

/// Mock provider that serves route responses from JSON files.
///
/// Responses are keyed by destination name, so every origin and departure
/// time gets the same answer for a given stop.
#[derive(Clone)]
pub struct MockRoutingProvider {
    routes: Arc<RwLock<HashMap<String, RouteResponse>>>,
}

impl MockRoutingProvider {
    /// Create a new mock provider by loading JSON files from a directory.
    ///
    /// Expects files named `{destination}.json` (e.g., `Pier 39.json`),
    /// each holding a route response body.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, RoutingError> {
        let routes = load_dir(data_dir.as_ref())?;
        Ok(Self {
            routes: Arc::new(RwLock::new(routes)),
        })
    }

    /// Create a provider from in-memory responses.
    pub fn from_responses(routes: HashMap<String, RouteResponse>) -> Self {
        Self {
            routes: Arc::new(RwLock::new(routes)),
        }
    }

    /// List destinations with mock data.
    pub async fn available_destinations(&self) -> Vec<String> {
        let routes = self.routes.read().await;
        let mut names: Vec<String> = routes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Reload mock data from disk (useful for development).
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), RoutingError> {
        let fresh = load_dir(data_dir.as_ref())?;
        let mut routes = self.routes.write().await;
        *routes = fresh;
        Ok(())
    }
}

impl RouteProvider for MockRoutingProvider {
    async fn route(&self, request: &RouteRequest<'_>) -> Result<RouteSummary, RoutingError> {
        let routes = self.routes.read().await;

        let response = routes
            .get(request.destination.name())
            .ok_or_else(|| RoutingError::Api {
                status: 404,
                message: format!("No mock route for '{}'", request.destination.name()),
            })?;

        response.summarize()
    }
}

/// Fixtures carry no incident feed, so no incidents are ever reported.
impl IncidentProvider for MockRoutingProvider {
    async fn incidents(
        &self,
        _bbox: &BoundingBox,
        _window: &TimeWindow,
    ) -> Result<Vec<Incident>, RoutingError> {
        Ok(Vec::new())
    }
}

fn load_dir(data_dir: &Path) -> Result<HashMap<String, RouteResponse>, RoutingError> {
    let mut routes = HashMap::new();

    let entries = std::fs::read_dir(data_dir).map_err(|e| RoutingError::Api {
        status: 0,
        message: format!("Failed to read mock data directory: {}", e),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| RoutingError::Api {
            status: 0,
            message: format!("Failed to read directory entry: {}", e),
        })?;

        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        // "Pier 39.json" -> "Pier 39"
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| RoutingError::Api {
                status: 0,
                message: format!("Invalid filename: {:?}", path),
            })?;

        let json = std::fs::read_to_string(&path).map_err(|e| RoutingError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", path, e),
        })?;

        let response: RouteResponse =
            serde_json::from_str(&json).map_err(|e| RoutingError::Json {
                message: format!("Failed to parse {:?}: {}", path, e),
                body: None,
            })?;

        routes.insert(name.to_string(), response);
    }

    if routes.is_empty() {
        return Err(RoutingError::Api {
            status: 0,
            message: format!("No mock route files found in {:?}", data_dir),
        });
    }

    Ok(routes)
}
