use coalesce::{CoalesceConfig, CoalesceError, Coalescer, CoalescerBuilder};
use coalesce_mock::MockProvider;

/// Return a builder preloaded with providers for the demos.
///
/// With `COALESCE_DEMOS_USE_MOCK` set, the three fixture providers are registered;
/// otherwise the default HTTP endpoints are used.
#[must_use]
pub fn providers() -> CoalescerBuilder {
    if std::env::var("COALESCE_DEMOS_USE_MOCK").is_ok() {
        println!("--- (Using mock providers for CI) ---");
        MockProvider::fixture_set()
            .into_iter()
            .fold(Coalescer::builder(), |b, p| b.with_provider(p))
    } else {
        Coalescer::builder().config(CoalesceConfig::default())
    }
}

/// Build a coalescer over [`providers`] with default settings.
///
/// # Errors
/// Returns an error if the HTTP client cannot be constructed.
pub fn coalescer() -> Result<Coalescer, CoalesceError> {
    providers().build()
}
