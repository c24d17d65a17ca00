//! Asynchronous Cloudlets v3 client implementation.

use crate::models::{
    ClonePolicyRequest, CreateSharedPolicyRequest, DeleteSharedPolicyRequest,
    GetSharedPolicyRequest, ListActivePolicyPropertiesRequest, ListSharedPoliciesRequest,
    ListSharedPoliciesResponse, Policy, PolicyProperties, UpdateSharedPolicyRequest,
};
use crate::Result;
use edgegrid_core::client::{
    ApiClient, ApiClientBuilder, Call, ClientConfig, CLOUDLETS_DEFAULT_TIMEOUT,
};
use edgegrid_core::config::EdgeGridConfig;
use edgegrid_core::error::ConfigError;
use edgegrid_core::transport::{RequestSigner, Transport};
use edgegrid_core::types::{ApiFamily, Operation};
use reqwest::StatusCode;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("edgegrid-cloudlets/", env!("CARGO_PKG_VERSION"));

const POLICIES: &str = "/cloudlets/v3/policies";
const POLICY: &str = "/cloudlets/v3/policies/{policyId}";
const POLICY_CLONE: &str = "/cloudlets/v3/policies/{policyId}/clone";
const POLICY_PROPERTIES: &str = "/cloudlets/v3/policies/{policyId}/properties";

/// Listing shared policies.
pub const LIST_SHARED_POLICIES: Operation =
    Operation::new(ApiFamily::Cloudlets, "list shared policies");
/// Creating a shared policy.
pub const CREATE_SHARED_POLICY: Operation =
    Operation::new(ApiFamily::Cloudlets, "create shared policy");
/// Deleting a shared policy.
pub const DELETE_SHARED_POLICY: Operation =
    Operation::new(ApiFamily::Cloudlets, "delete shared policy");
/// Fetching a shared policy.
pub const GET_SHARED_POLICY: Operation = Operation::new(ApiFamily::Cloudlets, "get shared policy");
/// Updating a shared policy.
pub const UPDATE_SHARED_POLICY: Operation =
    Operation::new(ApiFamily::Cloudlets, "update shared policy");
/// Cloning a policy.
pub const CLONE_POLICY: Operation = Operation::new(ApiFamily::Cloudlets, "clone policy");
/// Listing the properties a policy is active on.
pub const LIST_ACTIVE_POLICY_PROPERTIES: Operation =
    Operation::new(ApiFamily::Cloudlets, "list active policy properties");

/// Builder for [`CloudletsClient`].
#[derive(Clone)]
pub struct CloudletsClientBuilder {
    inner: ApiClientBuilder,
}

impl CloudletsClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> std::result::Result<Self, ConfigError> {
        let builder =
            ApiClientBuilder::new(base_url, Duration::from_secs(CLOUDLETS_DEFAULT_TIMEOUT))?
                .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a shared configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Cloudlets endpoint cannot be resolved.
    pub fn from_config(config: &EdgeGridConfig) -> std::result::Result<Self, ConfigError> {
        let builder = ApiClientBuilder::from_config(config, ApiFamily::Cloudlets)?
            .with_user_agent(USER_AGENT);
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
    pub fn build(self) -> std::result::Result<CloudletsClient, ConfigError> {
        let inner = self.inner.build()?;
        Ok(CloudletsClient { inner })
    }
}

/// Asynchronous Cloudlets v3 client.
#[derive(Clone)]
pub struct CloudletsClient {
    inner: ApiClient,
}

impl CloudletsClient {
    /// Construct a client directly from the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> std::result::Result<Self, ConfigError> {
        CloudletsClientBuilder::new(base_url)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List one page of shared policies.
    ///
    /// # Errors
    ///
    /// Fails with [`LIST_SHARED_POLICIES`] as the operation.
    pub async fn list_shared_policies(
        &self,
        request: &ListSharedPoliciesRequest,
    ) -> Result<ListSharedPoliciesResponse> {
        self.inner
            .send(
                Call::get(LIST_SHARED_POLICIES, POLICIES)
                    .query(request.to_query())
                    .validated(request),
            )
            .await
    }

    /// Create a shared policy.
    ///
    /// # Errors
    ///
    /// Fails with [`CREATE_SHARED_POLICY`] as the operation.
    pub async fn create_shared_policy(
        &self,
        request: &CreateSharedPolicyRequest,
    ) -> Result<Policy> {
        self.inner
            .send(
                Call::post(CREATE_SHARED_POLICY, POLICIES)
                    .json_body(request)
                    .expect_status(StatusCode::CREATED)
                    .validated(request),
            )
            .await
    }

    /// Delete a shared policy.
    ///
    /// # Errors
    ///
    /// Fails with [`DELETE_SHARED_POLICY`] as the operation.
    pub async fn delete_shared_policy(&self, request: &DeleteSharedPolicyRequest) -> Result<()> {
        self.inner
            .send_no_content(
                Call::delete(DELETE_SHARED_POLICY, POLICY)
                    .path_param("policyId", request.policy_id)
                    .expect_status(StatusCode::NO_CONTENT)
                    .validated(request),
            )
            .await
    }

    /// Fetch a shared policy.
    ///
    /// # Errors
    ///
    /// Fails with [`GET_SHARED_POLICY`] as the operation.
    pub async fn get_shared_policy(&self, request: &GetSharedPolicyRequest) -> Result<Policy> {
        self.inner
            .send(
                Call::get(GET_SHARED_POLICY, POLICY)
                    .path_param("policyId", request.policy_id)
                    .validated(request),
            )
            .await
    }

    /// Update the group and description of a shared policy.
    ///
    /// # Errors
    ///
    /// Fails with [`UPDATE_SHARED_POLICY`] as the operation.
    pub async fn update_shared_policy(
        &self,
        request: &UpdateSharedPolicyRequest,
    ) -> Result<Policy> {
        self.inner
            .send(
                Call::put(UPDATE_SHARED_POLICY, POLICY)
                    .path_param("policyId", request.policy_id)
                    .json_body(&request.body)
                    .validated(request),
            )
            .await
    }

    /// Clone a policy into a new shared policy.
    ///
    /// # Errors
    ///
    /// Fails with [`CLONE_POLICY`] as the operation.
    pub async fn clone_policy(&self, request: &ClonePolicyRequest) -> Result<Policy> {
        self.inner
            .send(
                Call::post(CLONE_POLICY, POLICY_CLONE)
                    .path_param("policyId", request.policy_id)
                    .json_body(&request.body)
                    .validated(request),
            )
            .await
    }

    /// List the properties a policy is currently active on.
    ///
    /// # Errors
    ///
    /// Fails with [`LIST_ACTIVE_POLICY_PROPERTIES`] as the operation.
    pub async fn list_active_policy_properties(
        &self,
        request: &ListActivePolicyPropertiesRequest,
    ) -> Result<PolicyProperties> {
        self.inner
            .send(
                Call::get(LIST_ACTIVE_POLICY_PROPERTIES, POLICY_PROPERTIES)
                    .path_param("policyId", request.policy_id)
                    .query(request.to_query())
                    .validated(request),
            )
            .await
    }
}
