//! # edgegrid-core
//!
//! Shared machinery for the EdgeGrid API clients.
//!
//! Every operation of every API family goes through the same pipeline:
//! validate the request, build the HTTP request, execute it through a
//! [`transport::Transport`] and interpret the response. Failures come back as
//! a single [`Error`] type that names the failed [`types::Operation`].
//!
//! ## Modules
//!
//! - [`client`] - Call declarations, the operation pipeline and HTTP settings
//! - [`config`] - Host, credentials and per-family endpoint configuration
//! - [`error`] - Operation errors and their categories
//! - [`link`] - Resolution of identifiers from response links
//! - [`problem`] - Normalization of API error bodies
//! - [`query`] - Deterministic query parameter building
//! - [`transport`] - The network seam and request signing
//! - [`types`] - API families and operation identifiers
//! - [`validation`] - Field rules for request values

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod link;
pub mod problem;
pub mod query;
pub mod transport;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use client::{ApiClient, ApiClientBuilder, Call, ClientConfig};
pub use config::EdgeGridConfig;
pub use error::{ConfigError, Error, ErrorKind, Result, TransportError};
pub use link::{parse_response_link, LinkedResponse, ResponseLinkError};
pub use problem::ApiError;
pub use query::QueryParams;
pub use types::{ApiFamily, Operation};
pub use validation::{Rules, Validate, ValidationErrors};
