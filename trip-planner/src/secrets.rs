//! Secret lookup and the routing API key cache.
//!
//! The routing provider's API key is stored as a JSON secret with an
//! `INRIX_API_KEY` field. A key that cannot be read from the secret store
//! falls back to the `INRIX_API_KEY` environment value.
//!
//! Resolved keys are cached for the lifetime of the process. The cache has
//! no TTL, no size bound and is never invalidated: rotating the key
//! requires a restart. Failed lookups are not cached, so a later request
//! retries the store.

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tracing::{error, info, warn};

/// JSON field holding the API key inside the secret.
pub const API_KEY_FIELD: &str = "INRIX_API_KEY";

/// Cache key used when no secret name is configured.
const ENV_ONLY_KEY: &str = "env";

/// Errors from a secret store backend.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// The backend could not be reached or refused the request
    #[error("secret backend error: {0}")]
    Backend(String),

    /// The secret exists but its value is unusable
    #[error("secret '{name}' is malformed: {message}")]
    Malformed { name: String, message: String },
}

/// A source of named secrets.
pub trait SecretStore: Send + Sync {
    /// Fetch a secret by name. `Ok(None)` means the secret does not exist.
    fn get_secret(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, SecretError>> + Send;
}

/// Secret store backed by process environment variables.
///
/// A secret name is mapped to a variable name by upper-casing it and
/// replacing every non-alphanumeric character with `_`, so the name
/// `trip/inrix-key` is read from `TRIP_INRIX_KEY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn variable_name(secret_name: &str) -> String {
        secret_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>, SecretError> {
        match std::env::var(Self::variable_name(name)) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::Malformed {
                name: name.to_string(),
                message: "value is not valid UTF-8".to_string(),
            }),
        }
    }
}

/// Extract the API key field from a JSON secret value.
pub fn extract_api_key(secret: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(secret).ok()?;
    value
        .get(API_KEY_FIELD)?
        .as_str()
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

/// Process-lifetime cache of the routing API key.
pub struct ApiKeyCache<S> {
    store: S,
    secret_name: Option<String>,
    env_key: Option<String>,
    keys: MokaCache<String, Arc<str>>,
}

impl<S: SecretStore> ApiKeyCache<S> {
    /// Create a cache reading `secret_name` from `store`, with `env_key` as
    /// the fallback value.
    pub fn new(store: S, secret_name: Option<String>, env_key: Option<String>) -> Self {
        // No time_to_live, time_to_idle or max_capacity: entries never expire.
        let keys = MokaCache::builder().build();

        Self {
            store,
            secret_name,
            env_key,
            keys,
        }
    }

    /// The API key, fetched on first use and cached afterwards.
    ///
    /// Returns `None` if neither the store nor the fallback has a key.
    pub async fn api_key(&self) -> Option<Arc<str>> {
        let cache_key = self
            .secret_name
            .clone()
            .unwrap_or_else(|| ENV_ONLY_KEY.to_string());

        self.keys.optionally_get_with(cache_key, self.resolve()).await
    }

    async fn resolve(&self) -> Option<Arc<str>> {
        match &self.secret_name {
            Some(name) => match self.store.get_secret(name).await {
                Ok(Some(value)) => match extract_api_key(&value) {
                    Some(key) => {
                        info!(secret = %name, "Retrieved routing API key");
                        return Some(Arc::from(key));
                    }
                    None => warn!(secret = %name, field = API_KEY_FIELD, "Secret has no API key field"),
                },
                Ok(None) => error!(secret = %name, "Secret not found"),
                Err(e) => error!(secret = %name, error = %e, "Failed to retrieve secret"),
            },
            None => warn!("No routing secret name configured, using environment key"),
        }

        self.env_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(Arc::from)
    }
}
