use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the coalesce workspace.
///
/// This covers argument validation, empty aggregation input, provider-tagged
/// transport and data failures, per-provider timeouts, and configuration problems.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoalesceError {
    /// Invalid caller-supplied argument (entity id, endpoint template, builder input).
    ///
    /// Raised before any network activity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A strategy received input it cannot reduce, e.g. zero records.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out after {timeout_ms}ms: {provider}")]
    ProviderTimeout {
        /// Provider name that timed out.
        provider: String,
        /// Timeout that was applied, in milliseconds.
        timeout_ms: u64,
    },

    /// The provider could not be reached or answered with a failure status.
    #[error("{provider} transport failed: {msg}")]
    Transport {
        /// Provider name that failed.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The provider answered, but the body is not a mapping of numeric fields.
    #[error("{provider} returned unusable data: {msg}")]
    Data {
        /// Provider name that produced the data.
        provider: String,
        /// Description of what was wrong with the body.
        msg: String,
    },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl CoalesceError {
    /// Helper: build an `InvalidArgument` error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Helper: build an `InvalidInput` error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(provider: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Helper: build a `Transport` error with the provider name and message.
    pub fn transport(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Data` error with the provider name and message.
    pub fn data(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Data {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Returns true for per-provider timeouts, which the enumerator recovers from.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::ProviderTimeout { .. })
    }

    /// Attribute an error returned by `provider` to it.
    ///
    /// Provider-tagged variants pass through unchanged; anything else, including
    /// validation errors raised inside the provider, becomes a `Transport` failure
    /// of `provider`.
    #[must_use]
    pub fn tagged(self, provider: &str) -> Self {
        match self {
            e @ (Self::ProviderTimeout { .. } | Self::Transport { .. } | Self::Data { .. }) => e,
            other => Self::Transport {
                provider: provider.to_string(),
                msg: other.to_string(),
            },
        }
    }

    /// Name of the provider this error is attributed to, if any.
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::ProviderTimeout { provider, .. }
            | Self::Transport { provider, .. }
            | Self::Data { provider, .. } => Some(provider),
            _ => None,
        }
    }
}
