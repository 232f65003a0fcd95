use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level failure, before the connector attaches its provider name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the adapter timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The remote host could not be reached.
    #[error("connection failed: {0}")]
    Connect(String),
    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// GET abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait HttpGet: Send + Sync {
    /// Fetch `url` and return its status and body.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Real adapter backed by a shared `reqwest::Client`.
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Clone, Debug)]
pub struct ReqwestAdapter {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestAdapter {
    /// User agent sent with every request.
    pub const USER_AGENT: &'static str = concat!("coalesce/", env!("CARGO_PKG_VERSION"));

    /// Build a client with an optional per-request timeout.
    ///
    /// # Errors
    /// Returns `TransportError::Other` if the TLS backend cannot be initialised.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(Self::USER_AGENT);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build http client: {e}")))?;
        Ok(Self { client, timeout })
    }

    fn map_err(&self, e: &reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(self.timeout.unwrap_or_default())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

#[async_trait]
impl HttpGet for ReqwestAdapter {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_err(&e))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| self.map_err(&e))?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

impl dyn HttpGet {
    /// Build an `HttpGet` from a closure taking the rendered URL.
    pub fn from_fn<F>(f: F) -> Arc<dyn HttpGet>
    where
        F: Send + Sync + 'static + Fn(&str) -> Result<HttpResponse, TransportError>,
    {
        struct FnGet<F>(F);

        #[async_trait]
        impl<F> HttpGet for FnGet<F>
        where
            F: Send + Sync + 'static + Fn(&str) -> Result<HttpResponse, TransportError>,
        {
            async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
                (self.0)(url)
            }
        }

        Arc::new(FnGet(f))
    }
}
