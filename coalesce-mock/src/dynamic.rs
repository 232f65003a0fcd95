use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use coalesce_core::{CoalesceError, EntityId, Record, RecordProvider};

/// Instruction for how a fetch should behave for a given entity.
#[derive(Clone, Debug)]
pub enum MockBehavior {
    /// Return the provided record immediately.
    Return(Record),
    /// Fail immediately with the provided error.
    Fail(CoalesceError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
    /// Sleep for the duration, then return the record.
    Delay(Duration, Record),
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<EntityId, MockBehavior>,
    fallback: Option<MockBehavior>,
    requests: Vec<EntityId>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
#[derive(Clone)]
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for fetches of a specific entity.
    pub async fn set_behavior(&self, entity: EntityId, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(entity, behavior);
    }

    /// Set the behavior for entities without a specific rule.
    pub async fn set_default_behavior(&self, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.fallback = Some(behavior);
    }

    /// Entities requested so far, in call order.
    pub async fn requests(&self) -> Vec<EntityId> {
        let guard = self.state.lock().await;
        guard.requests.clone()
    }

    /// Number of fetch calls received so far.
    pub async fn calls(&self) -> usize {
        let guard = self.state.lock().await;
        guard.requests.len()
    }

    /// Clear all configured behaviors and the request log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.fallback = None;
        guard.requests.clear();
    }
}

/// A provider that defers all behavior to an external controller.
pub struct DynamicMockProvider {
    name: String,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockProvider {
    /// Create a new dynamic mock provider and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: impl Into<String>,
    ) -> (Arc<dyn RecordProvider>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self {
            name: name.into(),
            state,
        });
        (me as Arc<dyn RecordProvider>, controller)
    }
}

#[async_trait]
impl RecordProvider for DynamicMockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, entity: &EntityId) -> Result<Record, CoalesceError> {
        // Log and snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push(entity.clone());
            guard
                .rules
                .get(entity)
                .or(guard.fallback.as_ref())
                .cloned()
        };

        match behavior {
            Some(MockBehavior::Return(r)) => Ok(r),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            Some(MockBehavior::Delay(d, r)) => {
                tokio::time::sleep(d).await;
                Ok(r)
            }
            None => Err(CoalesceError::transport(
                &self.name,
                format!("no behavior scripted for {entity}"),
            )),
        }
    }
}
