//! coalesce-http
//!
//! Record provider that fetches JSON over HTTP. Each `HttpProvider` owns one
//! endpoint template; the entity id is substituted into it, the URL is fetched
//! with a single GET, and the body must be a JSON object of numbers.
#![warn(missing_docs)]

/// Transport adapters: the `HttpGet` trait and the `reqwest`-backed implementation.
pub mod adapter;

use std::sync::Arc;
use std::time::Duration;

use adapter::{HttpGet, ReqwestAdapter, TransportError};
use async_trait::async_trait;
use coalesce_core::{
    CoalesceError, EndpointTemplate, EntityId, Record, RecordProvider, record_from_json,
};

/// Provider backed by one URL template.
pub struct HttpProvider {
    name: String,
    template: EndpointTemplate,
    http: Arc<dyn HttpGet>,
}

impl HttpProvider {
    /// Build with a fresh `reqwest` client and no client-side timeout.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be constructed.
    pub fn new(template: EndpointTemplate) -> Result<Self, CoalesceError> {
        let http = ReqwestAdapter::new(None).map_err(|e| CoalesceError::Config(e.to_string()))?;
        Ok(Self::with_adapter(template, Arc::new(http)))
    }

    /// Build on an injected transport.
    #[must_use]
    pub fn with_adapter(template: EndpointTemplate, http: Arc<dyn HttpGet>) -> Self {
        Self {
            name: template.host().to_string(),
            template,
            http,
        }
    }

    /// One provider per template, all sharing a single `reqwest` client.
    ///
    /// `timeout` is applied by the client as well; the orchestrator enforces its own
    /// bound regardless.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be constructed.
    pub fn from_templates(
        templates: &[EndpointTemplate],
        timeout: Option<Duration>,
    ) -> Result<Vec<Self>, CoalesceError> {
        let http: Arc<dyn HttpGet> = Arc::new(
            ReqwestAdapter::new(timeout).map_err(|e| CoalesceError::Config(e.to_string()))?,
        );
        Ok(templates
            .iter()
            .map(|t| Self::with_adapter(t.clone(), Arc::clone(&http)))
            .collect())
    }

    /// Override the provider name (defaults to the template host).
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The endpoint template this provider renders.
    #[must_use]
    pub const fn template(&self) -> &EndpointTemplate {
        &self.template
    }

    fn normalize_error(&self, e: TransportError) -> CoalesceError {
        match e {
            TransportError::Timeout(d) => CoalesceError::provider_timeout(&self.name, d),
            TransportError::Connect(msg) | TransportError::Other(msg) => {
                CoalesceError::transport(&self.name, msg)
            }
        }
    }
}

#[async_trait]
impl RecordProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn locate(&self, entity: &EntityId) -> Option<String> {
        Some(self.template.render(entity))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "coalesce_http::fetch",
            skip(self, entity),
            fields(provider = %self.name, entity = %entity),
        )
    )]
    async fn fetch(&self, entity: &EntityId) -> Result<Record, CoalesceError> {
        let url = self.template.render(entity);
        let resp = self
            .http
            .get(&url)
            .await
            .map_err(|e| self.normalize_error(e))?;

        if !resp.is_success() {
            return Err(CoalesceError::transport(
                &self.name,
                format!("status {}: {url}", resp.status),
            ));
        }

        let body: serde_json::Value = serde_json::from_slice(&resp.body)
            .map_err(|e| CoalesceError::data(&self.name, format!("invalid JSON: {e}")))?;
        record_from_json(&self.name, &body)
    }
}
