//! Report envelopes produced by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::CoalesceError;
use crate::record::AggregateRecord;

/// Summary of one coalescing run.
///
/// Carries the reduced `aggregate`, the providers whose records fed it (in query
/// order), and the non-fatal problems met on the way: timeouts, and failures
/// skipped under `FailurePolicy::Skip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalesceReport {
    /// Entity the records were requested for.
    pub entity: EntityId,
    /// Strategy output.
    pub aggregate: AggregateRecord,
    /// Names of providers that yielded a record.
    pub contributors: Vec<String>,
    /// Non-fatal issues encountered while enumerating providers.
    pub warnings: Vec<CoalesceError>,
}
