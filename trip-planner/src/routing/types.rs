//! Routing provider response DTOs.
//!
//! These map directly to the provider's JSON. Fields are optional or
//! defaulted because the provider omits rather than nulls them.

use serde::{Deserialize, Serialize};

use crate::domain::{EtaEstimate, Incident};

use super::error::RoutingError;

/// Response from `GET /routing/route`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

/// One segment of a route.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RouteLeg {
    /// Travel time for the leg. Missing durations count as zero.
    #[serde(default)]
    pub duration: Option<LegDuration>,

    /// Incidents on the leg; only the count is used.
    #[serde(default)]
    pub incidents: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LegDuration {
    /// Seconds.
    pub value: f64,
}

/// Totals over every leg of the first route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub duration_secs: f64,
    pub incidents: u32,
}

impl RouteSummary {
    /// Convert to an estimate in minutes; p80 carries the traffic buffer.
    pub fn to_estimate(self) -> EtaEstimate {
        EtaEstimate::from_mean(self.duration_secs / 60.0, self.incidents)
    }
}

impl RouteResponse {
    /// Sum durations and incidents over the first route's legs.
    ///
    /// A response with no routes, or a first route with no legs, is an
    /// error: the provider could not route the pair.
    pub fn summarize(&self) -> Result<RouteSummary, RoutingError> {
        let legs = self
            .routes
            .first()
            .map(|r| r.legs.as_slice())
            .unwrap_or_default();

        if legs.is_empty() {
            return Err(RoutingError::NoLegs);
        }

        let duration_secs: f64 = legs
            .iter()
            .filter_map(|leg| leg.duration.map(|d| d.value))
            .sum();
        let incidents: u32 = legs.iter().map(|leg| leg.incidents.len() as u32).sum();

        Ok(RouteSummary {
            duration_secs,
            incidents,
        })
    }
}

/// Response from `GET /incidents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentsResponse {
    #[serde(default)]
    pub incidents: Vec<IncidentDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDto {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub start_time: Option<String>,
    pub severity: Option<String>,
}

impl From<IncidentDto> for Incident {
    fn from(dto: IncidentDto) -> Self {
        Incident {
            segment_id: dto.id.unwrap_or_default(),
            kind: dto.kind.unwrap_or_else(|| "unknown".to_string()),
            start: dto.start_time.unwrap_or_default(),
            severity: dto.severity.unwrap_or_else(|| "moderate".to_string()),
        }
    }
}
