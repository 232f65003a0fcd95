//! Configuration types shared by the orchestrator and connectors.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoint::EndpointTemplate;
use crate::error::CoalesceError;

/// Default bound on a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Stock member-data endpoints, queried in this order.
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://api1.com?member_id={}",
    "https://api2.com?member_id={}",
    "https://api3.com?member_id={}",
];

/// What the enumerator does with provider failures other than timeouts.
///
/// Timeouts are always skipped; this only governs connection errors, failure
/// statuses, and unusable bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop enumerating and return the failure to the caller unchanged.
    #[default]
    Propagate,
    /// Log a warning and continue with the next provider, like a timeout.
    Skip,
}

/// Global configuration for the `Coalescer` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoalesceConfig {
    /// Ordered provider endpoints; query order follows this list.
    pub endpoints: Vec<EndpointTemplate>,
    /// Timeout for individual provider requests.
    #[serde(rename = "provider_timeout_ms", with = "duration_ms")]
    pub provider_timeout: Duration,
    /// Handling of non-timeout provider failures.
    pub failure_policy: FailurePolicy,
}

impl Default for CoalesceConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl CoalesceConfig {
    /// Parse a JSON document; omitted keys take their defaults.
    ///
    /// # Errors
    /// Returns `Config` for malformed JSON or invalid endpoint templates, and
    /// `InvalidArgument` when the parsed configuration fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, CoalesceError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| CoalesceError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    /// Returns `Config` if the file cannot be read, otherwise as [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoalesceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoalesceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// Check the invariants the orchestrator relies on.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for an empty endpoint list or a zero timeout.
    pub fn validate(&self) -> Result<(), CoalesceError> {
        if self.endpoints.is_empty() {
            return Err(CoalesceError::invalid_argument(
                "configuration lists no endpoints",
            ));
        }
        if self.provider_timeout.is_zero() {
            return Err(CoalesceError::invalid_argument(
                "provider timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Parsed [`DEFAULT_ENDPOINTS`].
#[must_use]
pub fn default_endpoints() -> Vec<EndpointTemplate> {
    DEFAULT_ENDPOINTS
        .iter()
        .filter_map(|raw| EndpointTemplate::parse(*raw).ok())
        .collect()
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
