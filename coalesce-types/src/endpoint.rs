//! Provider endpoint templates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::CoalesceError;

/// Substitution slot for the entity identifier inside a template.
pub const PLACEHOLDER: &str = "{}";

/// A provider URL with exactly one [`PLACEHOLDER`] for the entity identifier.
///
/// Templates are validated once at parse time: the slot must appear exactly once
/// and the template must form an absolute URL once an identifier is substituted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointTemplate {
    raw: String,
    host: String,
}

impl EndpointTemplate {
    /// Parse and validate a template string.
    ///
    /// # Errors
    /// Returns `InvalidArgument` when the template does not contain exactly one
    /// placeholder or does not yield an absolute URL with a host.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoalesceError> {
        let raw = raw.into();
        let slots = raw.matches(PLACEHOLDER).count();
        if slots != 1 {
            return Err(CoalesceError::invalid_argument(format!(
                "endpoint template `{raw}` must contain exactly one `{PLACEHOLDER}` slot, found {slots}"
            )));
        }

        let probe = raw.replacen(PLACEHOLDER, "0", 1);
        let url = url::Url::parse(&probe).map_err(|e| {
            CoalesceError::invalid_argument(format!("endpoint template `{raw}`: {e}"))
        })?;
        let host = url
            .host_str()
            .ok_or_else(|| {
                CoalesceError::invalid_argument(format!("endpoint template `{raw}` has no host"))
            })?
            .to_string();

        Ok(Self { raw, host })
    }

    /// Substitute `entity` into the slot, form-encoding reserved characters.
    #[must_use]
    pub fn render(&self, entity: &EntityId) -> String {
        self.raw.replacen(PLACEHOLDER, &entity.encoded(), 1)
    }

    /// The host the template points at; used as the default provider name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for EndpointTemplate {
    type Error = CoalesceError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl TryFrom<&str> for EndpointTemplate {
    type Error = CoalesceError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl std::str::FromStr for EndpointTemplate {
    type Err = CoalesceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<EndpointTemplate> for String {
    fn from(t: EndpointTemplate) -> Self {
        t.raw
    }
}
