use async_trait::async_trait;

use crate::{CoalesceError, EntityId, Record};

/// A remote source that holds one numeric record per entity.
///
/// Implementations perform a single attempt per call. Timeouts are applied by
/// the orchestrator, so a provider may simply await its transport.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Stable, human-readable name used in diagnostics and reports.
    fn name(&self) -> &str;

    /// Fetch the record for `entity`.
    async fn fetch(&self, entity: &EntityId) -> Result<Record, CoalesceError>;

    /// Concrete location queried for `entity` (e.g. the rendered URL), if the
    /// provider has one. Used only for diagnostics.
    fn locate(&self, _entity: &EntityId) -> Option<String> {
        None
    }
}
