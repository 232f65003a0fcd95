//! Coalesce fetches numeric records for one entity from several providers and
//! reduces them into a single aggregate record.
//!
//! Overview
//! - Providers implement [`RecordProvider`]; HTTP endpoints are wrapped by
//!   [`HttpProvider`], built from `{}` URL templates.
//! - Providers are queried sequentially, in registration order, through a lazy
//!   [`RecordStream`] handed to a [`Strategy`].
//! - Each provider call is bounded by a timeout (60s by default). A provider that
//!   exceeds it is skipped and an error-level `tracing` event names it.
//! - Other failures either end the run ([`FailurePolicy::Propagate`], the default) or
//!   are skipped with a warning ([`FailurePolicy::Skip`]).
//!
//! Key behaviors and trade-offs
//! - Sequential fetching keeps provider load predictable; total latency is the sum of
//!   the provider latencies, bounded by `providers × timeout`.
//! - [`Mean`] divides by the number of records that actually arrived, so a skipped
//!   provider changes the denominator rather than counting as zero. Results are
//!   truncated toward zero at the configured scale.
//! - Records may be sparse: a missing field contributes nothing to its sum but the
//!   record still counts toward the mean's denominator.
//!
//! Examples
//! ```rust,ignore
//! use coalesce::{Coalescer, CoalesceConfig};
//!
//! let coalescer = Coalescer::from_config(CoalesceConfig::default())?;
//! let averaged = coalescer.coalesce("1").await?;
//! println!("{averaged:?}");
//! ```
//!
//! Custom providers and strategies:
//! ```rust,ignore
//! use std::sync::Arc;
//! use coalesce::{Coalescer, Sum};
//!
//! let coalescer = Coalescer::builder()
//!     .with_provider(Arc::new(MyProvider::default()))
//!     .build()?;
//! let totals = coalescer.coalesce_with("1", &Sum).await?;
//! ```
//!
//! See `demos/examples/` for runnable demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod pipeline;
mod source;

pub use core::{Coalescer, CoalescerBuilder};
pub use source::{RetrievalLog, RetrievalSummary};

pub use coalesce_http::HttpProvider;

// Re-export core types for convenience
pub use coalesce_core::{
    AggregateRecord, CoalesceConfig, CoalesceError, CoalesceReport, DEFAULT_ENDPOINTS,
    DEFAULT_PROVIDER_TIMEOUT, Decimal, EndpointTemplate, EntityId, FailurePolicy, IntoEntityId,
    Mean, Record, RecordProvider, RecordStream, Strategy, Sum, Tally,
};
