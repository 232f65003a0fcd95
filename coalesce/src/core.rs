use std::sync::Arc;
use std::time::Duration;

use coalesce_core::{
    CoalesceConfig, CoalesceError, EndpointTemplate, EntityId, FailurePolicy, Record,
    RecordProvider,
};
use coalesce_core::DEFAULT_PROVIDER_TIMEOUT;
use coalesce_http::HttpProvider;

/// Orchestrator that queries registered providers in order and reduces their records.
pub struct Coalescer {
    pub(crate) providers: Vec<Arc<dyn RecordProvider>>,
    pub(crate) provider_timeout: Duration,
    pub(crate) failure_policy: FailurePolicy,
}

enum Source {
    Provider(Arc<dyn RecordProvider>),
    Endpoint(EndpointTemplate),
}

/// Builder for constructing a `Coalescer` with custom configuration.
pub struct CoalescerBuilder {
    sources: Vec<Source>,
    provider_timeout: Duration,
    failure_policy: FailurePolicy,
}

impl Default for CoalescerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoalescerBuilder {
    /// Create a new builder with defaults.
    ///
    /// Behavior:
    /// - Starts with no providers; register at least one via [`with_provider`](Self::with_provider)
    ///   or [`with_endpoint`](Self::with_endpoint).
    /// - 60s provider timeout; non-timeout failures propagate to the caller.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: vec![],
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Register a provider.
    ///
    /// Providers are queried in registration order, one at a time. Duplicates are
    /// not removed; registering the same provider twice queries it twice.
    #[must_use]
    pub fn with_provider(mut self, p: Arc<dyn RecordProvider>) -> Self {
        self.sources.push(Source::Provider(p));
        self
    }

    /// Register an HTTP endpoint; an [`HttpProvider`] is built for it in [`build`](Self::build).
    ///
    /// All endpoints share one HTTP client.
    #[must_use]
    pub fn with_endpoint(mut self, template: EndpointTemplate) -> Self {
        self.sources.push(Source::Endpoint(template));
        self
    }

    /// Set the per-provider request timeout.
    ///
    /// A provider that does not answer in time is skipped with an error-level
    /// diagnostic; it is never retried.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Select how failures other than timeouts are handled.
    #[must_use]
    pub const fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Apply a loaded configuration: its endpoints are appended in order and its
    /// timeout and failure policy replace the current ones.
    #[must_use]
    pub fn config(mut self, cfg: CoalesceConfig) -> Self {
        self.sources
            .extend(cfg.endpoints.into_iter().map(Source::Endpoint));
        self.provider_timeout = cfg.provider_timeout;
        self.failure_policy = cfg.failure_policy;
        self
    }

    /// Build the `Coalescer`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if no providers were registered or the timeout is
    /// zero, and `Config` if the HTTP client for endpoints cannot be constructed.
    pub fn build(self) -> Result<Coalescer, CoalesceError> {
        if self.sources.is_empty() {
            return Err(CoalesceError::invalid_argument(
                "no providers registered; add at least one via with_provider(...) or with_endpoint(...)",
            ));
        }
        if self.provider_timeout.is_zero() {
            return Err(CoalesceError::invalid_argument(
                "provider timeout must be greater than zero",
            ));
        }

        let templates: Vec<EndpointTemplate> = self
            .sources
            .iter()
            .filter_map(|s| match s {
                Source::Endpoint(t) => Some(t.clone()),
                Source::Provider(_) => None,
            })
            .collect();
        let mut http = if templates.is_empty() {
            Vec::new()
        } else {
            HttpProvider::from_templates(&templates, Some(self.provider_timeout))?
        }
        .into_iter();

        let mut providers: Vec<Arc<dyn RecordProvider>> = Vec::with_capacity(self.sources.len());
        for source in self.sources {
            match source {
                Source::Provider(p) => providers.push(p),
                Source::Endpoint(_) => {
                    if let Some(h) = http.next() {
                        providers.push(Arc::new(h));
                    }
                }
            }
        }

        Ok(Coalescer {
            providers,
            provider_timeout: self.provider_timeout,
            failure_policy: self.failure_policy,
        })
    }
}

impl Coalescer {
    /// Start building a new `Coalescer`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let coalescer = coalesce::Coalescer::builder()
    ///     .with_endpoint("https://api1.com?member_id={}".parse()?)
    ///     .with_provider(Arc::new(MyProvider::default()))
    ///     .provider_timeout(Duration::from_secs(10))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> CoalescerBuilder {
        CoalescerBuilder::new()
    }

    /// Build HTTP providers for every endpoint of `cfg`.
    ///
    /// # Errors
    /// As [`CoalescerBuilder::build`], plus any error from [`CoalesceConfig::validate`].
    pub fn from_config(cfg: CoalesceConfig) -> Result<Self, CoalesceError> {
        cfg.validate()?;
        Self::builder().config(cfg).build()
    }

    /// Registered providers, in query order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn RecordProvider>] {
        &self.providers
    }

    /// Bound applied to each provider call.
    #[must_use]
    pub const fn provider_timeout(&self) -> Duration {
        self.provider_timeout
    }

    /// Handling of non-timeout failures.
    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Fetch from one provider under a timeout and standardized error mapping.
    #[tracing::instrument(
        name = "coalesce::core::provider_call_with_timeout",
        level = "debug",
        skip(provider, entity),
        fields(
            provider = provider.name(),
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ),
    )]
    pub(crate) async fn provider_call_with_timeout(
        provider: &dyn RecordProvider,
        entity: &EntityId,
        timeout: Duration,
    ) -> Result<Record, CoalesceError> {
        (tokio::time::timeout(timeout, provider.fetch(entity)).await)
            .unwrap_or_else(|_| Err(CoalesceError::provider_timeout(provider.name(), timeout)))
            .map_err(|e| e.tagged(provider.name()))
    }
}
