//! HTTP client configuration and the operation pipeline.
//!
//! Every API operation is declared as a [`Call`] and executed by
//! [`ApiClient`], which runs the same steps for all of them:
//!
//! 1. validate the request (no network on failure),
//! 2. build the URL from the path template, path parameters and sorted query,
//! 3. hand the request to the [`Transport`],
//! 4. compare the status against the single expected code and either decode
//!    the body or normalize the error.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::EdgeGridConfig;
use crate::error::{ConfigError, Error, ErrorKind, Result};
use crate::link::{parse_response_link, LinkedResponse};
use crate::problem::ApiError;
use crate::query::QueryParams;
use crate::transport::{
    BearerTokenSigner, HttpRequest, HttpResponse, ReqwestTransport, RequestSigner, Transport,
};
use crate::types::{ApiFamily, Operation};
use crate::validation::Validate;

// Family-specific timeout configurations (in seconds)

/// Default timeout for PAPI requests
pub const PAPI_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for IAM requests
pub const IAM_DEFAULT_TIMEOUT: u64 = 20;

/// Default timeout for Cloudlets requests
pub const CLOUDLETS_DEFAULT_TIMEOUT: u64 = 20;

/// Default timeout for NetStorage requests (larger for storage operations)
pub const NETSTORAGE_DEFAULT_TIMEOUT: u64 = 60;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Query parameter used to act on behalf of another account.
pub const ACCOUNT_SWITCH_KEY_PARAM: &str = "accountSwitchKey";

const DEFAULT_USER_AGENT: &str = concat!("edgegrid-core/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
///
/// Configures the transport: timeouts, connection pooling and compression.
/// The pipeline itself never retries or caches.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,

    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Declaration of one API call.
///
/// Built by API crates from a request value; nothing happens until it is
/// handed to [`ApiClient`].
#[must_use]
pub struct Call<'a> {
    operation: Operation,
    method: Method,
    template: &'static str,
    path_params: Vec<(&'static str, String)>,
    query: QueryParams,
    body: Option<std::result::Result<Bytes, String>>,
    expected: StatusCode,
    request: Option<&'a (dyn Validate + Sync)>,
}

impl<'a> Call<'a> {
    /// Declare a call with an explicit method. Expects `200 OK` by default.
    pub fn new(operation: Operation, method: Method, template: &'static str) -> Self {
        Self {
            operation,
            method,
            template,
            path_params: Vec::new(),
            query: QueryParams::new(),
            body: None,
            expected: StatusCode::OK,
            request: None,
        }
    }

    /// Declare a `GET` call.
    pub fn get(operation: Operation, template: &'static str) -> Self {
        Self::new(operation, Method::GET, template)
    }

    /// Declare a `POST` call.
    pub fn post(operation: Operation, template: &'static str) -> Self {
        Self::new(operation, Method::POST, template)
    }

    /// Declare a `PUT` call.
    pub fn put(operation: Operation, template: &'static str) -> Self {
        Self::new(operation, Method::PUT, template)
    }

    /// Declare a `DELETE` call.
    pub fn delete(operation: Operation, template: &'static str) -> Self {
        Self::new(operation, Method::DELETE, template)
    }

    /// Bind a `{name}` placeholder of the path template.
    pub fn path_param(mut self, name: &'static str, value: impl Display) -> Self {
        self.path_params.push((name, value.to_string()));
        self
    }

    /// Set the query parameters.
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Serialize `body` as the JSON request payload.
    pub fn json_body<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(
            serde_json::to_vec(body)
                .map(Bytes::from)
                .map_err(|err| format!("failed to serialize request body: {err}")),
        );
        self
    }

    /// The single status code that counts as success.
    pub fn expect_status(mut self, status: StatusCode) -> Self {
        self.expected = status;
        self
    }

    /// The request value validated before anything is built.
    pub fn validated(mut self, request: &'a (dyn Validate + Sync)) -> Self {
        self.request = Some(request);
        self
    }

    /// The operation this call performs.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    fn fail(&self, kind: ErrorKind) -> Error {
        Error::new(self.operation, kind)
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Executes [`Call`]s against one API host.
///
/// Holds no per-call state; clones share the transport and can be used from
/// many tasks at once.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    account_switch_key: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` using the given transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(
        base_url: impl AsRef<str>,
        transport: Arc<dyn Transport>,
    ) -> std::result::Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url.as_ref())?;
        Ok(Self {
            base_url,
            transport,
            account_switch_key: None,
        })
    }

    /// Act on behalf of another account for every call.
    #[must_use]
    pub fn with_account_switch_key(mut self, key: impl Into<String>) -> Self {
        self.account_switch_key = Some(key.into());
        self
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the configured account switch key.
    #[must_use]
    pub fn account_switch_key(&self) -> Option<&str> {
        self.account_switch_key.as_deref()
    }

    /// Run the call and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] naming the call's operation for any failure.
    pub async fn send<R>(&self, call: Call<'_>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let operation = call.operation;
        let response = self.dispatch(call).await?;
        decode(operation, &response)
    }

    /// Run the call, decode the body and resolve its response link.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ResponseLink`] when the link cannot be resolved,
    /// in addition to every failure of [`Self::send`].
    pub async fn send_linked<R>(&self, call: Call<'_>) -> Result<R>
    where
        R: DeserializeOwned + LinkedResponse,
    {
        let operation = call.operation;
        let mut result: R = self.send(call).await?;
        let id = parse_response_link(result.response_link())
            .map_err(|err| Error::new(operation, ErrorKind::ResponseLink(err)))?;
        result.attach_id(id);
        Ok(result)
    }

    /// Run a call whose success response carries no body.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] naming the call's operation for any failure.
    pub async fn send_no_content(&self, call: Call<'_>) -> Result<()> {
        self.dispatch(call).await.map(|_| ())
    }

    /// Validate the call and build its HTTP request without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Validation`] or [`ErrorKind::Request`].
    pub fn prepare(&self, call: &Call<'_>) -> Result<HttpRequest> {
        if let Some(request) = call.request {
            request
                .validate()
                .map_err(|errors| call.fail(ErrorKind::Validation(errors)))?;
        }
        self.build_request(call)
    }

    async fn dispatch(&self, call: Call<'_>) -> Result<HttpResponse> {
        debug!(operation = %call.operation, family = %call.operation.family(), "API operation");

        let request = self.prepare(&call)?;

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|err| call.fail(ErrorKind::Transport(err)))?;

        if response.status != call.expected {
            return Err(call.fail(ErrorKind::Api(ApiError::from_response(
                call.operation.family(),
                response.status,
                &response.body,
            ))));
        }

        Ok(response)
    }

    fn build_request(&self, call: &Call<'_>) -> Result<HttpRequest> {
        let url = self
            .build_url(call)
            .map_err(|message| call.fail(ErrorKind::Request(message)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let body = match &call.body {
            None => None,
            Some(Ok(bytes)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(bytes.clone())
            }
            Some(Err(message)) => return Err(call.fail(ErrorKind::Request(message.clone()))),
        };

        Ok(HttpRequest {
            method: call.method.clone(),
            url,
            headers,
            body,
        })
    }

    fn build_url(&self, call: &Call<'_>) -> std::result::Result<Url, String> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| format!("base URL `{}` cannot carry a path", self.base_url))?;
            segments.pop_if_empty();

            for segment in call.template.split('/').filter(|s| !s.is_empty()) {
                if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    let value = call
                        .lookup(name)
                        .ok_or_else(|| format!("missing path parameter `{name}`"))?;
                    if value.is_empty() {
                        return Err(format!("empty path parameter `{name}`"));
                    }
                    segments.push(value);
                } else if segment.contains(['{', '}']) {
                    return Err(format!("malformed path template `{}`", call.template));
                } else {
                    segments.push(segment);
                }
            }
        }

        let mut query = call.query.clone();
        if let Some(key) = &self.account_switch_key {
            query.push(ACCOUNT_SWITCH_KEY_PARAM, key);
        }

        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.into_pairs());
        }

        Ok(url)
    }
}

fn decode<R: DeserializeOwned>(operation: Operation, response: &HttpResponse) -> Result<R> {
    serde_json::from_slice(&response.body)
        .map_err(|err| Error::new(operation, ErrorKind::Decode(err.to_string())))
}

fn parse_base_url(base_url: &str) -> std::result::Result<Url, ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|err| ConfigError::Invalid(format!("Invalid base URL `{base_url}`: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid(format!(
            "Base URL `{base_url}` cannot carry a path"
        )));
    }
    Ok(url)
}

/// Builder for [`ApiClient`].
///
/// API crates wrap this builder, passing their default timeout and
/// User-Agent.
#[derive(Clone)]
pub struct ApiClientBuilder {
    base_url: String,
    http_config: ClientConfig,
    signer: Option<Arc<dyn RequestSigner>>,
    transport: Option<Arc<dyn Transport>>,
    account_switch_key: Option<String>,
}

impl ApiClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> std::result::Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url.as_ref())?;
        Ok(Self {
            base_url: base_url.to_string(),
            http_config: ClientConfig::new().with_timeout(timeout),
            signer: None,
            transport: None,
            account_switch_key: None,
        })
    }

    /// Create a builder for one family from an [`EdgeGridConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the family's endpoint cannot be resolved.
    pub fn from_config(
        config: &EdgeGridConfig,
        family: ApiFamily,
    ) -> std::result::Result<Self, ConfigError> {
        let (base_url, timeout) = config.endpoint_for(family)?;
        let mut builder = Self::new(base_url.as_str(), timeout)?;
        builder.http_config = builder
            .http_config
            .with_compression(config.enable_compression);
        builder.account_switch_key = config.account_switch_key.clone();
        if let Some(token) = &config.access_token {
            builder = builder.with_token(token.clone());
        }
        Ok(builder)
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http_config = self.http_config.with_user_agent(user_agent);
        self
    }

    /// Override the HTTP client configuration, keeping the User-Agent.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        let user_agent = std::mem::take(&mut self.http_config.user_agent);
        self.http_config = config.with_user_agent(user_agent);
        self
    }

    /// Authenticate every request with a bearer token.
    #[must_use]
    pub fn with_token(self, token: SecretString) -> Self {
        self.with_signer(Arc::new(BearerTokenSigner::new(token)))
    }

    /// Use a custom request signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Use a custom transport instead of the default `reqwest` one.
    ///
    /// HTTP configuration and signer are ignored when a transport is given.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Act on behalf of another account.
    #[must_use]
    pub fn with_account_switch_key(mut self, key: impl Into<String>) -> Self {
        self.account_switch_key = Some(key.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(self) -> std::result::Result<ApiClient, ConfigError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut transport = ReqwestTransport::new(&self.http_config)?;
                if let Some(signer) = self.signer {
                    transport = transport.with_signer(signer);
                }
                Arc::new(transport)
            }
        };

        let mut client = ApiClient::new(&self.base_url, transport)?;
        client.account_switch_key = self.account_switch_key;
        Ok(client)
    }
}
