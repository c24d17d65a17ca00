//! Asynchronous PAPI client implementation.

use crate::models::{
    ActivateIncludeRequest, ActivationIncludeResponse, ActivationType, CreatePropertyRequest,
    CreatePropertyResponse, DeactivateIncludeRequest, DeactivationIncludeResponse,
    GetIncludeActivationRequest, GetPropertiesRequest, GetPropertiesResponse, GetPropertyRequest,
    GetPropertyResponse, IncludeActivationResponse, IncludeActivationsResponse,
    ListIncludeActivationsRequest, RemovePropertyRequest, RemovePropertyResponse,
};
use crate::Result;
use edgegrid_core::client::{ApiClient, ApiClientBuilder, Call, ClientConfig, PAPI_DEFAULT_TIMEOUT};
use edgegrid_core::config::EdgeGridConfig;
use edgegrid_core::error::ConfigError;
use edgegrid_core::transport::{RequestSigner, Transport};
use edgegrid_core::types::{ApiFamily, Operation};
use reqwest::StatusCode;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("edgegrid-papi/", env!("CARGO_PKG_VERSION"));

const PROPERTIES: &str = "/papi/v1/properties";
const PROPERTY: &str = "/papi/v1/properties/{propertyId}";
const INCLUDE_ACTIVATIONS: &str = "/papi/v1/includes/{includeId}/activations";
const INCLUDE_ACTIVATION: &str = "/papi/v1/includes/{includeId}/activations/{activationId}";

/// Listing the properties of a contract and group.
pub const GET_PROPERTIES: Operation = Operation::new(ApiFamily::Papi, "get properties");
/// Creating a property.
pub const CREATE_PROPERTY: Operation = Operation::new(ApiFamily::Papi, "create property");
/// Fetching a property.
pub const GET_PROPERTY: Operation = Operation::new(ApiFamily::Papi, "get property");
/// Removing a property.
pub const REMOVE_PROPERTY: Operation = Operation::new(ApiFamily::Papi, "remove property");
/// Activating an include version.
pub const ACTIVATE_INCLUDE: Operation = Operation::new(ApiFamily::Papi, "activate include");
/// Deactivating an include version.
pub const DEACTIVATE_INCLUDE: Operation = Operation::new(ApiFamily::Papi, "deactivate include");
/// Fetching an include activation.
pub const GET_INCLUDE_ACTIVATION: Operation =
    Operation::new(ApiFamily::Papi, "get include activation");
/// Listing include activations.
pub const LIST_INCLUDE_ACTIVATIONS: Operation =
    Operation::new(ApiFamily::Papi, "list include activations");

/// Builder for [`PapiClient`].
#[derive(Clone)]
pub struct PapiClientBuilder {
    inner: ApiClientBuilder,
}

impl PapiClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> std::result::Result<Self, ConfigError> {
        let builder =
            ApiClientBuilder::new(base_url, Duration::from_secs(PAPI_DEFAULT_TIMEOUT))?
                .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a shared configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the PAPI endpoint cannot be resolved.
    pub fn from_config(config: &EdgeGridConfig) -> std::result::Result<Self, ConfigError> {
        let builder =
            ApiClientBuilder::from_config(config, ApiFamily::Papi)?.with_user_agent(USER_AGENT);
        Ok(Self { inner: builder })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Authenticate with a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Use a custom request signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.inner = self.inner.with_signer(signer);
        self
    }

    /// Use a custom transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.inner = self.inner.with_transport(transport);
        self
    }

    /// Act on behalf of another account.
    #[must_use]
    pub fn with_account_switch_key(mut self, key: impl Into<String>) -> Self {
        self.inner = self.inner.with_account_switch_key(key);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(self) -> std::result::Result<PapiClient, ConfigError> {
        let inner = self.inner.build()?;
        Ok(PapiClient { inner })
    }
}

/// Asynchronous PAPI client.
#[derive(Clone)]
pub struct PapiClient {
    inner: ApiClient,
}

impl PapiClient {
    /// Construct a client directly from the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> std::result::Result<Self, ConfigError> {
        PapiClientBuilder::new(base_url)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List the properties of a contract and group.
    ///
    /// # Errors
    ///
    /// Fails with [`GET_PROPERTIES`] as the operation.
    pub async fn get_properties(
        &self,
        request: &GetPropertiesRequest,
    ) -> Result<GetPropertiesResponse> {
        self.inner
            .send(
                Call::get(GET_PROPERTIES, PROPERTIES)
                    .query(request.to_query())
                    .validated(request),
            )
            .await
    }

    /// Create a property and resolve its identifier.
    ///
    /// # Errors
    ///
    /// Fails with [`CREATE_PROPERTY`] as the operation.
    pub async fn create_property(
        &self,
        request: &CreatePropertyRequest,
    ) -> Result<CreatePropertyResponse> {
        self.inner
            .send_linked(
                Call::post(CREATE_PROPERTY, PROPERTIES)
                    .query(request.to_query())
                    .json_body(&request.property)
                    .expect_status(StatusCode::CREATED)
                    .validated(request),
            )
            .await
    }

    /// Fetch a property.
    ///
    /// # Errors
    ///
    /// Fails with [`GET_PROPERTY`] as the operation.
    pub async fn get_property(&self, request: &GetPropertyRequest) -> Result<GetPropertyResponse> {
        let mut response: GetPropertyResponse = self
            .inner
            .send(
                Call::get(GET_PROPERTY, PROPERTY)
                    .path_param("propertyId", &request.property_id)
                    .query(request.to_query())
                    .validated(request),
            )
            .await?;

        response.property = response.properties.items.first().cloned();
        Ok(response)
    }

    /// Remove a property.
    ///
    /// # Errors
    ///
    /// Fails with [`REMOVE_PROPERTY`] as the operation.
    pub async fn remove_property(
        &self,
        request: &RemovePropertyRequest,
    ) -> Result<RemovePropertyResponse> {
        self.inner
            .send(
                Call::delete(REMOVE_PROPERTY, PROPERTY)
                    .path_param("propertyId", &request.property_id)
                    .query(request.to_query())
                    .validated(request),
            )
            .await
    }

    /// Activate an include version.
    ///
    /// # Errors
    ///
    /// Fails with [`ACTIVATE_INCLUDE`] as the operation.
    pub async fn activate_include(
        &self,
        request: &ActivateIncludeRequest,
    ) -> Result<ActivationIncludeResponse> {
        self.include_activation(ACTIVATE_INCLUDE, ActivationType::Activate, request)
            .await
    }

    /// Deactivate an include version.
    ///
    /// # Errors
    ///
    /// Fails with [`DEACTIVATE_INCLUDE`] as the operation.
    pub async fn deactivate_include(
        &self,
        request: &DeactivateIncludeRequest,
    ) -> Result<DeactivationIncludeResponse> {
        self.include_activation(DEACTIVATE_INCLUDE, ActivationType::Deactivate, request)
            .await
    }

    /// Fetch one include activation.
    ///
    /// # Errors
    ///
    /// Fails with [`GET_INCLUDE_ACTIVATION`] as the operation.
    pub async fn get_include_activation(
        &self,
        request: &GetIncludeActivationRequest,
    ) -> Result<IncludeActivationResponse> {
        self.inner
            .send(
                Call::get(GET_INCLUDE_ACTIVATION, INCLUDE_ACTIVATION)
                    .path_param("includeId", &request.include_id)
                    .path_param("activationId", &request.activation_id)
                    .validated(request),
            )
            .await
    }

    /// List the activations of an include on both networks.
    ///
    /// # Errors
    ///
    /// Fails with [`LIST_INCLUDE_ACTIVATIONS`] as the operation.
    pub async fn list_include_activations(
        &self,
        request: &ListIncludeActivationsRequest,
    ) -> Result<IncludeActivationsResponse> {
        self.inner
            .send(
                Call::get(LIST_INCLUDE_ACTIVATIONS, INCLUDE_ACTIVATIONS)
                    .path_param("includeId", &request.include_id)
                    .query(request.to_query())
                    .validated(request),
            )
            .await
    }

    async fn include_activation(
        &self,
        operation: Operation,
        activation_type: ActivationType,
        request: &ActivateIncludeRequest,
    ) -> Result<ActivationIncludeResponse> {
        self.inner
            .send_linked(
                Call::post(operation, INCLUDE_ACTIVATIONS)
                    .path_param("includeId", &request.include_id)
                    .json_body(&request.body(activation_type))
                    .expect_status(StatusCode::CREATED)
                    .validated(request),
            )
            .await
    }
}
