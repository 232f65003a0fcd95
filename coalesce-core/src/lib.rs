//! coalesce-core
//!
//! Core traits and utilities shared across the coalesce ecosystem.
//!
//! - `provider`: the `RecordProvider` trait implemented by connectors.
//! - `stream`: `RecordStream`, the lazy single-pass input of a strategy.
//! - `strategy`: the `Strategy` trait and the built-in `Mean` and `Sum` reductions.
//!
//! Async runtime
//! -------------
//! Providers and strategies are `async_trait` objects. Nothing in this crate spawns
//! tasks or sleeps, so it runs under any executor; the `coalesce` orchestrator
//! applies per-provider timeouts with Tokio.
#![warn(missing_docs)]

/// The `RecordProvider` trait implemented by connectors.
pub mod provider;
/// The stream type strategies consume.
pub mod stream;
/// Reduction strategies.
pub mod strategy;

pub use provider::RecordProvider;
pub use strategy::{Mean, Strategy, Sum, Tally};
pub use stream::RecordStream;

pub use coalesce_types::*;
