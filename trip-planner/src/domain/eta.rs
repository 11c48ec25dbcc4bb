//! Travel-time estimates and the time-binned ETA matrix.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Multiplier from mean to 80th-percentile travel time.
pub const P80_FACTOR: f64 = 1.2;

/// Travel-time estimate for one leg at one departure time.
///
/// Invariant: `0 <= mean_minutes <= p80_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtaEstimate {
    pub mean_minutes: f64,
    pub p80_minutes: f64,
    pub incidents_count: u32,
}

impl EtaEstimate {
    /// Build an estimate from a mean, deriving the p80 figure.
    ///
    /// Negative or non-finite means are clamped to zero so the invariant
    /// holds whatever the source reported.
    pub fn from_mean(mean_minutes: f64, incidents_count: u32) -> Self {
        let mean_minutes = if mean_minutes.is_finite() {
            mean_minutes.max(0.0)
        } else {
            0.0
        };
        Self {
            mean_minutes,
            p80_minutes: mean_minutes * P80_FACTOR,
            incidents_count,
        }
    }

    /// The placeholder stored for a cell that could not be resolved.
    pub fn zeroed() -> Self {
        Self {
            mean_minutes: 0.0,
            p80_minutes: 0.0,
            incidents_count: 0,
        }
    }
}

/// Route key → bin label → estimate.
///
/// Route keys have the form `"Start->{stop}"`. A matrix is rebuilt
/// wholesale for each planning cycle, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EtaMatrix {
    routes: BTreeMap<String, BTreeMap<String, EtaEstimate>>,
}

impl EtaMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// The key under which legs from the trip start to `stop_name` are stored.
    pub fn route_key(stop_name: &str) -> String {
        format!("Start->{stop_name}")
    }

    /// Store the estimate for one (route, bin) cell, replacing any previous value.
    pub fn insert(&mut self, route_key: String, bin: String, estimate: EtaEstimate) {
        self.routes.entry(route_key).or_default().insert(bin, estimate);
    }

    /// Look up the start→stop estimate at a bin.
    pub fn get(&self, stop_name: &str, bin: &str) -> Option<&EtaEstimate> {
        self.routes.get(&Self::route_key(stop_name))?.get(bin)
    }

    /// All bins for one route key.
    pub fn route(&self, route_key: &str) -> Option<&BTreeMap<String, EtaEstimate>> {
        self.routes.get(route_key)
    }

    pub fn route_keys(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Total number of (route, bin) cells.
    pub fn cell_count(&self) -> usize {
        self.routes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A traffic incident reported inside a trip's bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub segment_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start: String,
    pub severity: String,
}
