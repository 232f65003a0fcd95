use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use coalesce_core::{CoalesceError, EntityId, Record, RecordProvider};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockProvider, MockBehavior};
pub use fixtures::members::PROVIDERS;

/// Entity id that makes every `MockProvider` fail with a transport error.
pub const FAIL: &str = "FAIL";
/// Entity id that makes every `MockProvider` hang until the orchestrator times out.
pub const TIMEOUT: &str = "TIMEOUT";

/// Mock provider for CI-safe examples. Serves deterministic member fixtures.
///
/// Fixtures exist for the providers named in [`PROVIDERS`]; any other name or an
/// unknown member id fails like a missing resource would over HTTP.
pub struct MockProvider {
    name: String,
    calls: AtomicUsize,
}

impl MockProvider {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// The three fixture providers, in query order.
    #[must_use]
    pub fn fixture_set() -> Vec<Arc<Self>> {
        PROVIDERS.iter().map(|n| Arc::new(Self::new(*n))).collect()
    }

    /// Number of `fetch` calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn locate(&self, entity: &EntityId) -> Option<String> {
        Some(format!("mock://{}/members/{}", self.name, entity.encoded()))
    }

    async fn fetch(&self, entity: &EntityId) -> Result<Record, CoalesceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match entity.as_str() {
            FAIL => Err(CoalesceError::transport(&self.name, "forced failure")),
            TIMEOUT => std::future::pending().await,
            id => fixtures::members::by_provider(&self.name, id).ok_or_else(|| {
                CoalesceError::transport(&self.name, format!("no record for member {id}"))
            }),
        }
    }
}
