//! Error types for API operations.
//!
//! Every failure returned by an operation is an [`Error`] that names the
//! [`Operation`] that failed and an [`ErrorKind`] describing why. Display
//! output composes both: `"activate include: struct validation: include_id: cannot be blank"`.

use thiserror::Error;

use crate::link::ResponseLinkError;
use crate::problem::ApiError;
use crate::types::Operation;
use crate::validation::ValidationErrors;

/// Failure of a single API operation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation}: {kind}")]
pub struct Error {
    operation: Operation,
    #[source]
    kind: ErrorKind,
}

/// Why an operation failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The request did not pass validation; nothing was sent.
    #[error("struct validation: {0}")]
    Validation(ValidationErrors),

    /// The HTTP request could not be constructed.
    #[error("failed to create request: {0}")]
    Request(String),

    /// The transport failed to deliver the request.
    #[error("request failed: {0}")]
    Transport(TransportError),

    /// The API answered with a status other than the expected one.
    #[error("{0}")]
    Api(ApiError),

    /// A successful response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A successful response carried an unusable resource link.
    #[error("invalid response link: {0}")]
    ResponseLink(ResponseLinkError),

    /// A client-side lookup found nothing.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Transport level failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request could not be signed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Configuration errors raised while building clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Specialized result type for API operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a failure reason with the operation it belongs to.
    #[must_use]
    pub const fn new(operation: Operation, kind: ErrorKind) -> Self {
        Self { operation, kind }
    }

    /// The operation that failed.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Why the operation failed.
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consume the error, returning the failure reason.
    #[must_use]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Normalized API error, when the failure came from the API.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match &self.kind {
            ErrorKind::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Validation failures, when the request was rejected locally.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match &self.kind {
            ErrorKind::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// HTTP status returned by the API, when the failure came from the API.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|err| err.status)
    }

    /// Returns true when the request never reached the network.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Validation(_) | ErrorKind::Request(_) | ErrorKind::NotFound(_)
        )
    }
}

impl ErrorKind {
    /// Returns the error code for this failure category.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "STRUCT_VALIDATION",
            Self::Request(_) => "INVALID_REQUEST",
            Self::Transport(_) => "REQUEST_FAILED",
            Self::Api(_) => "API_ERROR",
            Self::Decode(_) => "DECODE_FAILED",
            Self::ResponseLink(_) => "INVALID_RESPONSE_LINK",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

impl From<url::ParseError> for ConfigError {
    fn from(err: url::ParseError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Invalid(err.to_string())
    }
}
