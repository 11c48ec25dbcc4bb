//! Routing provider HTTP client.
//!
//! Provides async methods for the provider's route and incident endpoints.
//! Handles bearer authentication, per-call timeouts and a concurrency cap.
//! Retry and fallback live in the ETA resolver, not here: each call is a
//! single attempt.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::domain::{BoundingBox, Incident, TimeWindow, TravelMode};
use crate::secrets::{ApiKeyCache, EnvSecretStore, SecretStore};

use super::error::RoutingError;
use super::types::{IncidentsResponse, RouteResponse, RouteSummary};
use super::{IncidentProvider, RouteProvider, RouteRequest};

/// Default base URL for the routing API.
pub const DEFAULT_BASE_URL: &str = "https://api.inrix.com/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default per-call timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default routing region.
const DEFAULT_REGION: &str = "us";

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Routing region sent with every route request
    pub region: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RoutingConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the routing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Routing provider name for a travel mode.
///
/// Driving uses the traffic-aware provider; walking and mixed modes use
/// the multimodal one.
pub fn provider_for(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Drive => "inrix",
        TravelMode::Walk | TravelMode::Mix => "here",
    }
}

/// Query parameters for a route request.
pub fn route_query(request: &RouteRequest<'_>, region: &str) -> Vec<(&'static str, String)> {
    vec![
        (
            "origin",
            format!("{},{}", request.origin.lat(), request.origin.lon()),
        ),
        (
            "destination",
            format!("{},{}", request.destination.lat(), request.destination.lon()),
        ),
        ("departureTime", request.departure.to_rfc3339()),
        ("provider", provider_for(request.mode).to_string()),
        ("region", region.to_string()),
    ]
}

/// Query parameters for an incident request.
pub fn incident_query(bbox: &BoundingBox, window: &TimeWindow) -> Vec<(&'static str, String)> {
    vec![
        ("boundingBox", bbox.to_string()),
        ("startTime", window.start().to_rfc3339()),
        ("endTime", window.end().to_rfc3339()),
    ]
}

/// Routing API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
pub struct RoutingClient<S = EnvSecretStore> {
    http: reqwest::Client,
    base_url: String,
    region: String,
    keys: ApiKeyCache<S>,
    semaphore: Arc<Semaphore>,
}

impl<S: SecretStore> RoutingClient<S> {
    /// Create a new client; the API key is resolved lazily through `keys`.
    pub fn new(config: RoutingConfig, keys: ApiKeyCache<S>) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            region: config.region,
            keys,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// GET `{base_url}{path}` with bearer auth and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, RoutingError> {
        let api_key = self.keys.api_key().await.ok_or(RoutingError::MissingApiKey)?;
        let auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            RoutingError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            }
        })?;

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RoutingError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RoutingError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| RoutingError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Request a route and total its legs.
    pub async fn route(&self, request: &RouteRequest<'_>) -> Result<RouteSummary, RoutingError> {
        let query = route_query(request, &self.region);
        let response: RouteResponse = self.get_json("/routing/route", &query).await?;
        response.summarize()
    }

    /// Fetch incidents inside a bounding box during a window.
    pub async fn incidents(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
    ) -> Result<Vec<Incident>, RoutingError> {
        let query = incident_query(bbox, window);
        let response: IncidentsResponse = self.get_json("/incidents", &query).await?;
        Ok(response.incidents.into_iter().map(Incident::from).collect())
    }
}

impl<S: SecretStore> RouteProvider for RoutingClient<S> {
    async fn route(&self, request: &RouteRequest<'_>) -> Result<RouteSummary, RoutingError> {
        RoutingClient::route(self, request).await
    }
}

impl<S: SecretStore> IncidentProvider for RoutingClient<S> {
    async fn incidents(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
    ) -> Result<Vec<Incident>, RoutingError> {
        RoutingClient::incidents(self, bbox, window).await
    }
}
