#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use coalesce::{Coalescer, CoalescerBuilder, Decimal, EntityId, Record, RecordProvider};
use coalesce_mock::{DynamicMockController, DynamicMockProvider, MockBehavior, MockProvider};

// ---------- Lightweight fixtures and helpers for tests ----------

/// Member with records at all three fixture providers.
pub const MEMBER: &str = "1";
/// Member missing from the second fixture provider.
pub const SPARSE_MEMBER: &str = "2";

pub fn id(s: &str) -> EntityId {
    EntityId::new(s).unwrap()
}

pub fn rec(deductible: i64, stop_loss: i64, oop_max: i64) -> Record {
    [
        ("deductible", deductible),
        ("stop_loss", stop_loss),
        ("oop_max", oop_max),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), Decimal::from(v)))
    .collect()
}

/// The three member "1" records, in provider order.
pub fn member_records() -> [Record; 3] {
    [
        rec(1000, 10000, 5000),
        rec(1200, 13000, 6000),
        rec(1000, 10000, 6000),
    ]
}

/// Coalescer over the fixture `MockProvider`s; the providers are returned for call counting.
pub fn fixture_coalescer(builder: CoalescerBuilder) -> (Coalescer, Vec<Arc<MockProvider>>) {
    let providers = MockProvider::fixture_set();
    let mut b = builder;
    for p in &providers {
        b = b.with_provider(p.clone());
    }
    (b.build().unwrap(), providers)
}

/// One dynamic mock per behavior, each answering every entity the same way.
pub async fn scripted(
    builder: CoalescerBuilder,
    behaviors: Vec<MockBehavior>,
) -> (Coalescer, Vec<DynamicMockController>) {
    let mut b = builder;
    let mut controllers = Vec::new();
    for (i, behavior) in behaviors.into_iter().enumerate() {
        let (p, c) = DynamicMockProvider::new_with_controller(format!("api{}.com", i + 1));
        c.set_default_behavior(behavior).await;
        b = b.with_provider(p);
        controllers.push(c);
    }
    (b.build().unwrap(), controllers)
}

pub async fn calls(controllers: &[DynamicMockController]) -> Vec<usize> {
    let mut out = Vec::new();
    for c in controllers {
        out.push(c.calls().await);
    }
    out
}

pub fn names(providers: &[Arc<dyn RecordProvider>]) -> Vec<String> {
    providers.iter().map(|p| p.name().to_string()).collect()
}

pub const SHORT: Duration = Duration::from_millis(50);

// ---------- Log capture ----------

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's `tracing` output into a buffer until the guard is dropped.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    use tracing_subscriber::util::SubscriberInitExt;

    let buf = LogBuffer::default();
    let writer = buf.clone();
    let guard = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .finish()
        .set_default();
    (buf, guard)
}
