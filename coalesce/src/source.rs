use std::sync::Arc;
use std::time::Duration;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::ready;
use futures::stream::{self, StreamExt};

use coalesce_core::{
    CoalesceError, EntityId, FailurePolicy, IntoEntityId, Record, RecordProvider, RecordStream,
};

use crate::Coalescer;

/// What happened to one provider during an enumeration.
#[derive(Debug)]
enum Outcome {
    Yielded(String),
    Skipped(CoalesceError),
    Fault(CoalesceError),
}

enum Step {
    Yield(Record),
    Skip,
    Stop,
}

/// Handle that collects per-provider outcomes of a [`Coalescer::records`] stream.
///
/// Read it with [`summary`](Self::summary) once the stream has been consumed or
/// dropped; outcomes of providers that were never polled do not appear.
#[derive(Debug)]
pub struct RetrievalLog {
    rx: UnboundedReceiver<Outcome>,
}

/// Per-provider outcomes of one enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalSummary {
    /// Providers whose record was yielded, in query order.
    pub contributors: Vec<String>,
    /// Timeouts, plus failures skipped under [`FailurePolicy::Skip`].
    pub warnings: Vec<CoalesceError>,
    /// Failure that ended the stream under [`FailurePolicy::Propagate`].
    pub fault: Option<CoalesceError>,
}

impl RetrievalLog {
    /// Drain the outcomes recorded so far.
    #[must_use]
    pub fn summary(mut self) -> RetrievalSummary {
        let mut out = RetrievalSummary::default();
        while let Ok(outcome) = self.rx.try_recv() {
            match outcome {
                Outcome::Yielded(name) => out.contributors.push(name),
                Outcome::Skipped(e) => out.warnings.push(e),
                Outcome::Fault(e) => {
                    if out.fault.is_none() {
                        out.fault = Some(e);
                    }
                }
            }
        }
        out
    }
}

fn notify(tx: &UnboundedSender<Outcome>, outcome: Outcome) {
    // the log may already be gone; outcomes are then simply dropped
    let _ = tx.unbounded_send(outcome);
}

async fn visit(
    provider: Arc<dyn RecordProvider>,
    entity: EntityId,
    timeout: Duration,
    policy: FailurePolicy,
    tx: UnboundedSender<Outcome>,
) -> Step {
    match Coalescer::provider_call_with_timeout(provider.as_ref(), &entity, timeout).await {
        Ok(record) => {
            tracing::debug!(
                provider = %provider.name(),
                entity = %entity,
                fields = record.len(),
                "record received"
            );
            notify(&tx, Outcome::Yielded(provider.name().to_string()));
            Step::Yield(record)
        }
        Err(e) if e.is_timeout() => {
            let location = provider.locate(&entity);
            tracing::error!(
                provider = %provider.name(),
                entity = %entity,
                location = location.as_deref().unwrap_or("-"),
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "provider timed out; skipping"
            );
            notify(&tx, Outcome::Skipped(e));
            Step::Skip
        }
        Err(e) => match policy {
            FailurePolicy::Skip => {
                tracing::warn!(
                    provider = %provider.name(),
                    entity = %entity,
                    error = %e,
                    "provider failed; skipping"
                );
                notify(&tx, Outcome::Skipped(e));
                Step::Skip
            }
            FailurePolicy::Propagate => {
                tracing::debug!(
                    provider = %provider.name(),
                    entity = %entity,
                    error = %e,
                    "provider failed; stopping enumeration"
                );
                notify(&tx, Outcome::Fault(e));
                Step::Stop
            }
        },
    }
}

impl Coalescer {
    /// Lazily enumerate the records the registered providers hold for `entity`.
    ///
    /// Behavior:
    /// - Providers are queried one at a time, in registration order, and only when
    ///   the stream is polled; dropping the stream leaves later providers uncalled.
    /// - A provider that exceeds the configured timeout is skipped with an
    ///   error-level diagnostic naming the provider and entity.
    /// - Other failures are skipped with a warning under [`FailurePolicy::Skip`]; under
    ///   [`FailurePolicy::Propagate`] the stream ends and the failure is reported
    ///   through [`RetrievalLog::summary`].
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `entity` is missing or blank. No provider is
    /// contacted in that case.
    pub fn records(
        &self,
        entity: impl IntoEntityId,
    ) -> Result<(RecordStream, RetrievalLog), CoalesceError> {
        let entity = entity.into_entity_id()?;
        Ok(self.enumerate(entity))
    }

    pub(crate) fn enumerate(&self, entity: EntityId) -> (RecordStream, RetrievalLog) {
        let (tx, rx) = mpsc::unbounded();
        let timeout = self.provider_timeout;
        let policy = self.failure_policy;

        let steps = stream::iter(self.providers.clone())
            .then(move |p| visit(p, entity.clone(), timeout, policy, tx.clone()))
            .take_while(|step| ready(!matches!(step, Step::Stop)))
            .filter_map(|step| {
                ready(match step {
                    Step::Yield(record) => Some(record),
                    Step::Skip | Step::Stop => None,
                })
            });

        (RecordStream::new(steps), RetrievalLog { rx })
    }
}
