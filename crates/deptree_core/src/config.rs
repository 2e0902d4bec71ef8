//! Runtime configuration for the remote department service.
//!
//! # Invariants
//! - Every remote call is bounded by `RemoteConfig::timeout`.
//! - A blank endpoint override falls back to the default endpoint.

use std::time::Duration;

/// Environment variable overriding the GraphQL endpoint.
pub const ENDPOINT_ENV_VAR: &str = "DEPTREE_GRAPHQL_ENDPOINT";
/// Endpoint used when no override is set.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/graphql";
/// Upper bound for one remote call.
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: REMOTE_TIMEOUT,
        }
    }
}

impl RemoteConfig {
    /// Reads the endpoint from `DEPTREE_GRAPHQL_ENDPOINT`.
    pub fn from_env() -> Self {
        Self::from_endpoint_override(std::env::var(ENDPOINT_ENV_VAR).ok())
    }

    /// Builds config from an optional endpoint override.
    pub fn from_endpoint_override(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self {
            endpoint,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_override_uses_default_endpoint() {
        let config = RemoteConfig::from_endpoint_override(Some("  ".to_string()));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn override_is_trimmed() {
        let config =
            RemoteConfig::from_endpoint_override(Some(" https://api.example/graphql ".to_string()));
        assert_eq!(config.endpoint, "https://api.example/graphql");
    }
}
