//! Process configuration for the trip planner server.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::bins::DEFAULT_INTERVAL_MINS;
use crate::eta::{DEFAULT_MAX_CONCURRENT, RetryPolicy};
use crate::itinerary::DEFAULT_STAY_MINS;
use crate::routing::RoutingConfig;

/// Configuration for routing, ETA building and the HTTP listener.
#[derive(Clone)]
pub struct PlannerConfig {
    /// Base URL for the routing API.
    pub routing_base_url: String,

    /// Name of the secret holding the routing API key.
    pub api_key_secret_name: Option<String>,

    /// API key used when the secret is unavailable.
    pub env_api_key: Option<String>,

    /// Per-call routing timeout (seconds).
    pub request_timeout_secs: u64,

    /// Routing attempts per cell before falling back.
    pub max_attempts: u32,

    /// Pause between routing attempts.
    pub retry_delay: Duration,

    /// Maximum routing calls in flight.
    pub max_concurrent: usize,

    /// Default spacing between time bins (minutes).
    pub bin_interval_mins: i64,

    /// Default stay at each stop (minutes).
    pub stay_mins: i64,

    /// Routing region.
    pub region: String,

    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,

    /// Serve routes from JSON fixtures in this directory instead of the
    /// live API.
    pub mock_routes_dir: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let routing = RoutingConfig::default();
        Self {
            routing_base_url: routing.base_url,
            api_key_secret_name: None,
            env_api_key: None,
            request_timeout_secs: routing.timeout_secs,
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            bin_interval_mins: DEFAULT_INTERVAL_MINS,
            stay_mins: DEFAULT_STAY_MINS,
            region: routing.region,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            mock_routes_dir: None,
        }
    }
}

// The API key is never printed.
impl fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("routing_base_url", &self.routing_base_url)
            .field("api_key_secret_name", &self.api_key_secret_name)
            .field("env_api_key", &self.env_api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("max_concurrent", &self.max_concurrent)
            .field("bin_interval_mins", &self.bin_interval_mins)
            .field("stay_mins", &self.stay_mins)
            .field("region", &self.region)
            .field("bind_addr", &self.bind_addr)
            .field("mock_routes_dir", &self.mock_routes_dir)
            .finish()
    }
}

impl PlannerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Empty values count as unset; unparseable numbers keep
    /// the default and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            routing_base_url: get("INRIX_BASE_URL").unwrap_or(defaults.routing_base_url),
            api_key_secret_name: get("INRIX_SECRET_ARN"),
            env_api_key: get("INRIX_API_KEY"),
            request_timeout_secs: parse_or(
                "INRIX_TIMEOUT_SECS",
                get("INRIX_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            ),
            max_attempts: defaults.max_attempts,
            retry_delay: defaults.retry_delay,
            max_concurrent: parse_or(
                "ETA_MAX_CONCURRENT",
                get("ETA_MAX_CONCURRENT"),
                defaults.max_concurrent,
            ),
            bin_interval_mins: parse_or(
                "ETA_BIN_INTERVAL_MINS",
                get("ETA_BIN_INTERVAL_MINS"),
                defaults.bin_interval_mins,
            ),
            stay_mins: parse_or(
                "DEFAULT_STAY_MINS",
                get("DEFAULT_STAY_MINS"),
                defaults.stay_mins,
            ),
            region: get("INRIX_REGION").unwrap_or(defaults.region),
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), defaults.bind_addr),
            mock_routes_dir: get("MOCK_ROUTES_DIR").map(PathBuf::from),
        }
    }

    /// Settings for the routing HTTP client.
    pub fn routing(&self) -> RoutingConfig {
        RoutingConfig::default()
            .with_base_url(&self.routing_base_url)
            .with_region(&self.region)
            .with_max_concurrent(self.max_concurrent)
            .with_timeout(self.request_timeout_secs)
    }

    /// Retry schedule for routing calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_delay)
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    let Some(raw) = value else {
        return default;
    };
    match raw.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(key, value = %raw, default = %default, "Invalid configuration value, using default");
            default
        }
    }
}
