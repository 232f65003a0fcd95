//! Coalesce-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod endpoint;
mod entity;
mod error;
mod record;
mod reports;

pub use config::{
    CoalesceConfig, DEFAULT_ENDPOINTS, DEFAULT_PROVIDER_TIMEOUT, FailurePolicy, default_endpoints,
};
pub use endpoint::{EndpointTemplate, PLACEHOLDER};
pub use entity::{EntityId, IntoEntityId};
pub use error::CoalesceError;
pub use record::{AggregateRecord, Record, record_from_json};
pub use reports::CoalesceReport;

pub use rust_decimal::Decimal;
