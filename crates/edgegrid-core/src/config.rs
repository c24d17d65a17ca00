//! Configuration structures for EdgeGrid clients.
//!
//! An [`EdgeGridConfig`] names the API host, credentials and per-family
//! overrides. It can be built in code or deserialized from a file; either
//! way it must pass [`EdgeGridConfig::validated`] before clients use it.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

use crate::client::{
    CLOUDLETS_DEFAULT_TIMEOUT, IAM_DEFAULT_TIMEOUT, NETSTORAGE_DEFAULT_TIMEOUT,
    PAPI_DEFAULT_TIMEOUT,
};
use crate::error::ConfigError;
use crate::types::ApiFamily;

/// Configuration for an EdgeGrid client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EdgeGridConfig {
    /// API host base URL. A bare host name is given an `https://` scheme.
    #[validate(url)]
    pub host: String,

    /// Act on behalf of another account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_switch_key: Option<String>,

    /// Access token sent as a bearer credential. Never serialized.
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Request timeout in seconds, applied when no family override is set
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether responses may be compressed
    #[serde(default = "default_compression")]
    pub enable_compression: bool,

    /// Per-family endpoint overrides
    #[serde(default)]
    pub endpoints: ApiEndpoints,
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_compression() -> bool {
    true
}

fn normalize_host(host: String) -> String {
    if host.contains("://") {
        host
    } else {
        format!("https://{host}")
    }
}

impl EdgeGridConfig {
    /// Create a new configuration for an API host.
    ///
    /// # Arguments
    ///
    /// * `host` - The API host, e.g. `"akab-xxxx.luna.akamaiapis.net"` or a full URL
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a valid URL.
    pub fn new(host: impl Into<String>) -> Result<Self, ConfigError> {
        Self {
            host: normalize_host(host.into()),
            account_switch_key: None,
            access_token: None,
            request_timeout_secs: default_request_timeout_secs(),
            enable_compression: default_compression(),
            endpoints: ApiEndpoints::default(),
        }
        .validated()
    }

    /// Validate the configuration and every endpoint override.
    ///
    /// Call this after deserializing a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid section.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.host = normalize_host(self.host);
        self.validate()
            .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {e}")))?;
        for family in ApiFamily::all() {
            if let Some(endpoint) = self.endpoints.get(*family) {
                endpoint.validate().map_err(|e| {
                    ConfigError::Invalid(format!("Invalid {family} endpoint configuration: {e}"))
                })?;
            }
        }
        Ok(self)
    }

    /// Set the account switch key.
    #[must_use]
    pub fn with_account_switch_key(mut self, key: impl Into<String>) -> Self {
        self.account_switch_key = Some(key.into());
        self
    }

    /// Set the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Enable or disable response compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Set endpoint overrides.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: ApiEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse and validate the host URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.host)
            .map_err(|e| ConfigError::Invalid(format!("Invalid host URL: {e}")))
    }

    /// Base URL and timeout to use for a family.
    ///
    /// An endpoint override wins over the shared host; a family without a
    /// timeout override uses its own default.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved URL cannot be parsed.
    pub fn endpoint_for(&self, family: ApiFamily) -> Result<(Url, Duration), ConfigError> {
        match self.endpoints.get(family) {
            Some(endpoint) => {
                let url = Url::parse(&endpoint.url).map_err(|e| {
                    ConfigError::Invalid(format!("Invalid {family} endpoint URL: {e}"))
                })?;
                let timeout = endpoint
                    .timeout()
                    .unwrap_or_else(|| default_timeout(family));
                Ok((url, timeout))
            }
            None => Ok((self.base_url()?, self.timeout())),
        }
    }
}

/// Default request timeout for a family.
#[must_use]
pub const fn default_timeout(family: ApiFamily) -> Duration {
    Duration::from_secs(match family {
        ApiFamily::Papi => PAPI_DEFAULT_TIMEOUT,
        ApiFamily::Iam => IAM_DEFAULT_TIMEOUT,
        ApiFamily::Cloudlets => CLOUDLETS_DEFAULT_TIMEOUT,
        ApiFamily::NetStorage => NETSTORAGE_DEFAULT_TIMEOUT,
    })
}

/// Per-family endpoint overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEndpoints {
    /// PAPI endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub papi: Option<EndpointConfig>,

    /// IAM endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam: Option<EndpointConfig>,

    /// Cloudlets endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloudlets: Option<EndpointConfig>,

    /// NetStorage endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netstorage: Option<EndpointConfig>,
}

impl ApiEndpoints {
    /// Create an empty set of overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            papi: None,
            iam: None,
            cloudlets: None,
            netstorage: None,
        }
    }

    /// Override the endpoint of one family.
    #[must_use]
    pub fn with(mut self, family: ApiFamily, endpoint: EndpointConfig) -> Self {
        *self.slot(family) = Some(endpoint);
        self
    }

    /// Override for a family, if configured.
    #[must_use]
    pub const fn get(&self, family: ApiFamily) -> Option<&EndpointConfig> {
        match family {
            ApiFamily::Papi => self.papi.as_ref(),
            ApiFamily::Iam => self.iam.as_ref(),
            ApiFamily::Cloudlets => self.cloudlets.as_ref(),
            ApiFamily::NetStorage => self.netstorage.as_ref(),
        }
    }

    fn slot(&mut self, family: ApiFamily) -> &mut Option<EndpointConfig> {
        match family {
            ApiFamily::Papi => &mut self.papi,
            ApiFamily::Iam => &mut self.iam,
            ApiFamily::Cloudlets => &mut self.cloudlets,
            ApiFamily::NetStorage => &mut self.netstorage,
        }
    }
}

/// Configuration for a single family endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EndpointConfig {
    /// Endpoint base URL
    #[validate(url)]
    pub url: String,

    /// Optional timeout override for this family (in seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_override_secs: Option<u64>,
}

impl EndpointConfig {
    /// Create a new endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            url: url.into(),
            timeout_override_secs: None,
        };

        config
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("Invalid endpoint configuration: {e}")))?;

        Ok(config)
    }

    /// Set timeout override in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_override_secs = Some(seconds);
        self
    }

    /// Get the timeout as a Duration, if set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_override_secs.map(Duration::from_secs)
    }
}
