//! Validated entity identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoalesceError;

/// Identifier of the entity whose records are requested (e.g. a member id).
///
/// Always non-empty after trimming; construction is the only validation point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Validate and wrap an identifier.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `id` is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, CoalesceError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoalesceError::invalid_argument(
                "entity id must not be empty",
            ));
        }
        Ok(Self(id))
    }

    /// The identifier as provided.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier form-encoded for use inside a URL component.
    #[must_use]
    pub fn encoded(&self) -> String {
        url::form_urlencoded::byte_serialize(self.0.as_bytes()).collect()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityId {
    type Error = CoalesceError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = CoalesceError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl std::str::FromStr for EntityId {
    type Err = CoalesceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Conversion into a validated [`EntityId`], accepted by the pipeline entry points.
///
/// Implemented for strings, integers, existing ids, and `Option`s of those; `None`
/// stands for a missing identifier and is rejected like an empty one.
pub trait IntoEntityId {
    /// Validate `self` as an entity identifier.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for missing or empty identifiers.
    fn into_entity_id(self) -> Result<EntityId, CoalesceError>;
}

impl IntoEntityId for EntityId {
    fn into_entity_id(self) -> Result<EntityId, CoalesceError> {
        Ok(self)
    }
}

impl IntoEntityId for &EntityId {
    fn into_entity_id(self) -> Result<EntityId, CoalesceError> {
        Ok(self.clone())
    }
}

impl IntoEntityId for &str {
    fn into_entity_id(self) -> Result<EntityId, CoalesceError> {
        EntityId::new(self)
    }
}

impl IntoEntityId for String {
    fn into_entity_id(self) -> Result<EntityId, CoalesceError> {
        EntityId::new(self)
    }
}

impl IntoEntityId for &String {
    fn into_entity_id(self) -> Result<EntityId, CoalesceError> {
        EntityId::new(self.as_str())
    }
}

impl IntoEntityId for u64 {
    fn into_entity_id(self) -> Result<EntityId, CoalesceError> {
        EntityId::new(self.to_string())
    }
}

impl<T: IntoEntityId> IntoEntityId for Option<T> {
    fn into_entity_id(self) -> Result<EntityId, CoalesceError> {
        self.map_or_else(
            || Err(CoalesceError::invalid_argument("entity id is missing")),
            IntoEntityId::into_entity_id,
        )
    }
}
