//! Transport seam between the operation pipeline and the network.
//!
//! The pipeline only builds [`HttpRequest`] values and interprets
//! [`HttpResponse`] values; a [`Transport`] moves them over the wire. The
//! default [`ReqwestTransport`] owns connection pooling, timeouts and
//! compression, and asks a [`RequestSigner`] to authenticate every request
//! right before it is sent.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;
use url::Url;

use crate::client::ClientConfig;
use crate::error::{ConfigError, TransportError};

/// Connect timeout applied by [`ReqwestTransport`].
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// An HTTP request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL including the query string.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Serialized body, if any.
    pub body: Option<Bytes>,
}

/// An HTTP response as returned by a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Complete response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Build a response from a status and body, without headers.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Executes HTTP requests on behalf of the pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the complete response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response could be obtained.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Authenticates outgoing requests.
pub trait RequestSigner: Send + Sync {
    /// Add credentials to the request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Signing`] when the request cannot be signed.
    fn sign(&self, request: &mut reqwest::Request) -> Result<(), TransportError>;
}

/// Signer that leaves requests untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsigned;

impl RequestSigner for Unsigned {
    fn sign(&self, _request: &mut reqwest::Request) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Signer adding an `Authorization: Bearer` header.
#[derive(Clone)]
pub struct BearerTokenSigner {
    token: SecretString,
}

impl BearerTokenSigner {
    /// Create a signer from a token.
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl fmt::Debug for BearerTokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenSigner")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl RequestSigner for BearerTokenSigner {
    fn sign(&self, request: &mut reqwest::Request) -> Result<(), TransportError> {
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
                .map_err(|err| TransportError::Signing(err.to_string()))?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    signer: Arc<dyn RequestSigner>,
}

impl ReqwestTransport {
    /// Build a transport from the HTTP client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .gzip(config.enable_compression)
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;

        Ok(Self {
            http,
            signer: Arc::new(Unsigned),
        })
    }

    /// Replace the request signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let mut outgoing = builder.build()?;
        self.signer.sign(&mut outgoing)?;

        trace!(method = %outgoing.method(), url = %outgoing.url(), "sending request");

        let response = self.http.execute(outgoing).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
