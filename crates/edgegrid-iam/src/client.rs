//! Asynchronous IAM client implementation.

use crate::models::{
    BlockUsersRequest, GetPropertyRequest, GetPropertyResponse, ListPropertiesRequest,
    ListUsersForPropertyRequest, MapPropertyIdToNameRequest, MovePropertyRequest, Property,
    UsersForProperty,
};
use crate::Result;
use edgegrid_core::client::{ApiClient, ApiClientBuilder, Call, ClientConfig, IAM_DEFAULT_TIMEOUT};
use edgegrid_core::config::EdgeGridConfig;
use edgegrid_core::error::{ConfigError, Error, ErrorKind};
use edgegrid_core::transport::{RequestSigner, Transport};
use edgegrid_core::types::{ApiFamily, Operation};
use edgegrid_core::validation::Rules;
use reqwest::StatusCode;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("edgegrid-iam/", env!("CARGO_PKG_VERSION"));

const PROPERTIES: &str = "/identity-management/v3/user-admin/properties";
const PROPERTY: &str = "/identity-management/v3/user-admin/properties/{propertyId}";
const PROPERTY_USERS: &str = "/identity-management/v3/user-admin/properties/{propertyId}/users";
const BLOCK_USERS_PATH: &str =
    "/identity-management/v3/user-admin/properties/{propertyId}/users/block";

/// Listing properties.
pub const LIST_PROPERTIES: Operation = Operation::new(ApiFamily::Iam, "list properties");
/// Listing the users of a property.
pub const LIST_USERS_FOR_PROPERTY: Operation =
    Operation::new(ApiFamily::Iam, "list users for property");
/// Fetching a property.
pub const GET_PROPERTY: Operation = Operation::new(ApiFamily::Iam, "get property");
/// Moving a property between groups.
pub const MOVE_PROPERTY: Operation = Operation::new(ApiFamily::Iam, "move property");
/// Resolving a property name from its identifier.
pub const MAP_PROPERTY_ID_TO_NAME: Operation =
    Operation::new(ApiFamily::Iam, "map property by id");
/// Resolving a property identifier from its name.
pub const MAP_PROPERTY_NAME_TO_ID: Operation =
    Operation::new(ApiFamily::Iam, "map property by name");
/// Blocking users on a property.
pub const BLOCK_USERS: Operation = Operation::new(ApiFamily::Iam, "block users");

/// Builder for [`IamClient`].
#[derive(Clone)]
pub struct IamClientBuilder {
    inner: ApiClientBuilder,
}

impl IamClientBuilder {
    /// Create a builder for the specified base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> std::result::Result<Self, ConfigError> {
        let builder = ApiClientBuilder::new(base_url, Duration::from_secs(IAM_DEFAULT_TIMEOUT))?
            .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a shared configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the IAM endpoint cannot be resolved.
    pub fn from_config(config: &EdgeGridConfig) -> std::result::Result<Self, ConfigError> {
        let builder =
            ApiClientBuilder::from_config(config, ApiFamily::Iam)?.with_user_agent(USER_AGENT);
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
    pub fn build(self) -> std::result::Result<IamClient, ConfigError> {
        let inner = self.inner.build()?;
        Ok(IamClient { inner })
    }
}

/// Asynchronous IAM client for user-admin properties.
#[derive(Clone)]
pub struct IamClient {
    inner: ApiClient,
}

impl IamClient {
    /// Construct a client directly from the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> std::result::Result<Self, ConfigError> {
        IamClientBuilder::new(base_url)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List properties of the account, optionally limited to one group.
    ///
    /// # Errors
    ///
    /// Fails with [`LIST_PROPERTIES`] as the operation.
    pub async fn list_properties(&self, request: ListPropertiesRequest) -> Result<Vec<Property>> {
        self.inner
            .send(Call::get(LIST_PROPERTIES, PROPERTIES).query(request.to_query()))
            .await
    }

    /// List users who can access a property.
    ///
    /// # Errors
    ///
    /// Fails with [`LIST_USERS_FOR_PROPERTY`] as the operation.
    pub async fn list_users_for_property(
        &self,
        request: &ListUsersForPropertyRequest,
    ) -> Result<Vec<UsersForProperty>> {
        self.inner
            .send(
                Call::get(LIST_USERS_FOR_PROPERTY, PROPERTY_USERS)
                    .path_param("propertyId", request.property_id)
                    .query(request.to_query())
                    .validated(request),
            )
            .await
    }

    /// Fetch a property's details.
    ///
    /// # Errors
    ///
    /// Fails with [`GET_PROPERTY`] as the operation.
    pub async fn get_property(&self, request: &GetPropertyRequest) -> Result<GetPropertyResponse> {
        self.get_property_as(GET_PROPERTY, request).await
    }

    /// Move a property to another group.
    ///
    /// # Errors
    ///
    /// Fails with [`MOVE_PROPERTY`] as the operation.
    pub async fn move_property(&self, request: &MovePropertyRequest) -> Result<()> {
        self.inner
            .send_no_content(
                Call::put(MOVE_PROPERTY, PROPERTY)
                    .path_param("propertyId", request.property_id)
                    .json_body(&request.body)
                    .expect_status(StatusCode::NO_CONTENT)
                    .validated(request),
            )
            .await
    }

    /// Resolve a property name from its identifier.
    ///
    /// # Errors
    ///
    /// Fails with [`MAP_PROPERTY_ID_TO_NAME`] as the operation, including
    /// failures of the underlying lookup.
    pub async fn map_property_id_to_name(
        &self,
        request: &MapPropertyIdToNameRequest,
    ) -> Result<String> {
        self.get_property_as(MAP_PROPERTY_ID_TO_NAME, request)
            .await
            .map(|property| property.property_name)
    }

    /// Resolve a property identifier from its name.
    ///
    /// Lists every property of the account and returns the first one whose
    /// name matches exactly.
    ///
    /// # Errors
    ///
    /// Fails with [`MAP_PROPERTY_NAME_TO_ID`] as the operation, with
    /// [`ErrorKind::NotFound`] when no property has that name.
    pub async fn map_property_name_to_id(&self, name: &str) -> Result<i64> {
        debug!(operation = %MAP_PROPERTY_NAME_TO_ID, name, "resolving property name");

        Rules::new()
            .required("name", name)
            .finish()
            .map_err(|errors| Error::new(MAP_PROPERTY_NAME_TO_ID, ErrorKind::Validation(errors)))?;

        let properties = self
            .list_properties(ListPropertiesRequest::default())
            .await
            .map_err(|err| Error::new(MAP_PROPERTY_NAME_TO_ID, err.into_kind()))?;

        properties
            .into_iter()
            .find(|property| property.property_name == name)
            .map(|property| property.property_id)
            .ok_or_else(|| {
                Error::new(
                    MAP_PROPERTY_NAME_TO_ID,
                    ErrorKind::NotFound(format!("no such property: {name}")),
                )
            })
    }

    /// Block users on a property.
    ///
    /// # Errors
    ///
    /// Fails with [`BLOCK_USERS`] as the operation.
    pub async fn block_users(&self, request: &BlockUsersRequest) -> Result<Vec<UsersForProperty>> {
        self.inner
            .send(
                Call::put(BLOCK_USERS, BLOCK_USERS_PATH)
                    .path_param("propertyId", request.property_id)
                    .json_body(&request.body)
                    .validated(request),
            )
            .await
    }

    async fn get_property_as(
        &self,
        operation: Operation,
        request: &GetPropertyRequest,
    ) -> Result<GetPropertyResponse> {
        self.inner
            .send(
                Call::get(operation, PROPERTY)
                    .path_param("propertyId", request.property_id)
                    .query(request.to_query())
                    .validated(request),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockUserItem, MovePropertyReqBody, LOST_ACCESS_USERS};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> IamClient {
        IamClient::new(server.uri()).unwrap()
    }

    fn properties_body() -> serde_json::Value {
        json!([
            {
                "propertyId": 1,
                "propertyName": "property1",
                "propertyTypeDescription": "Site",
                "groupId": 11,
                "groupName": "group1"
            },
            {
                "propertyId": 2,
                "propertyName": "property2",
                "propertyTypeDescription": "Site",
                "groupId": 22,
                "groupName": "group2"
            }
        ])
    }

    fn property_body() -> serde_json::Value {
        json!({
            "arlConfigFile": "property1.xml",
            "createdBy": "jdoe",
            "createdDate": "2017-07-27T18:11:25.000Z",
            "groupId": 11,
            "groupName": "group1",
            "modifiedBy": "jsmith",
            "modifiedDate": "2017-07-27T18:11:25.000Z",
            "propertyId": 1,
            "propertyName": "property1"
        })
    }

    #[tokio::test]
    async fn list_properties_with_group_and_actions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/identity-management/v3/user-admin/properties"))
            .and(query_param("actions", "true"))
            .and(query_param("groupId", "11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(properties_body()))
            .expect(1)
            .mount(&server)
            .await;

        let properties = test_client(&server)
            .list_properties(ListPropertiesRequest {
                group_id: 11,
                actions: true,
            })
            .await
            .unwrap();

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[1].group_name, "group2");
    }

    #[tokio::test]
    async fn list_users_for_property_filters_by_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/identity-management/v3/user-admin/properties/1/users"))
            .and(query_param("userType", "lostAccess"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "firstName": "John",
                "isBlocked": false,
                "lastName": "Doe",
                "uiIdentityId": "A-B-123",
                "uiUserName": "jdoe"
            }])))
            .mount(&server)
            .await;

        let users = test_client(&server)
            .list_users_for_property(&ListUsersForPropertyRequest {
                property_id: 1,
                user_type: Some(LOST_ACCESS_USERS.into()),
            })
            .await
            .unwrap();
        assert_eq!(users[0].ui_identity_id, "A-B-123");
    }

    #[tokio::test]
    async fn list_users_for_property_rejects_unknown_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .list_users_for_property(&ListUsersForPropertyRequest {
                property_id: 1,
                user_type: Some("bogus".into()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.operation(), LIST_USERS_FOR_PROPERTY);
        assert!(err.validation_errors().unwrap().contains("user_type"));
    }

    #[tokio::test]
    async fn get_property_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/identity-management/v3/user-admin/properties/1"))
            .and(query_param("groupId", "11"))
            .respond_with(ResponseTemplate::new(200).set_body_json(property_body()))
            .mount(&server)
            .await;

        let property = test_client(&server)
            .get_property(&GetPropertyRequest {
                property_id: 1,
                group_id: 11,
            })
            .await
            .unwrap();
        assert_eq!(property.arl_config_file, "property1.xml");
        assert_eq!(property.created_date.to_rfc3339(), "2017-07-27T18:11:25+00:00");
    }

    #[tokio::test]
    async fn get_property_requires_both_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .get_property(&GetPropertyRequest::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "get property: struct validation: group_id: cannot be blank; property_id: cannot be blank"
        );
    }

    #[tokio::test]
    async fn move_property_expects_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/identity-management/v3/user-admin/properties/1"))
            .and(body_json(json!({
                "destinationGroupId": 22,
                "sourceGroupId": 11
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .move_property(&MovePropertyRequest {
                property_id: 1,
                body: MovePropertyReqBody {
                    destination_group_id: 22,
                    source_group_id: 11,
                },
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn move_property_treats_ok_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .move_property(&MovePropertyRequest {
                property_id: 1,
                body: MovePropertyReqBody {
                    destination_group_id: 22,
                    source_group_id: 11,
                },
            })
            .await
            .unwrap_err();

        let api = err.api_error().unwrap();
        assert_eq!(api.status, 200);
        assert_eq!(api.detail, "moved");
        assert_eq!(api.title, ApiFamily::Iam.unparsable_error_title());
    }

    #[tokio::test]
    async fn map_property_id_to_name_returns_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/identity-management/v3/user-admin/properties/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(property_body()))
            .mount(&server)
            .await;

        let name = test_client(&server)
            .map_property_id_to_name(&MapPropertyIdToNameRequest {
                property_id: 1,
                group_id: 11,
            })
            .await
            .unwrap();
        assert_eq!(name, "property1");
    }

    #[tokio::test]
    async fn map_property_id_to_name_reports_its_own_operation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "type": "/useradmin-api/error-types/1311",
                "title": "Property not found",
                "detail": "Property 3 not found",
                "status": 404
            })))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .map_property_id_to_name(&MapPropertyIdToNameRequest {
                property_id: 3,
                group_id: 11,
            })
            .await
            .unwrap_err();
        assert_eq!(err.operation(), MAP_PROPERTY_ID_TO_NAME);
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn map_property_name_to_id_finds_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/identity-management/v3/user-admin/properties"))
            .and(query_param("actions", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(properties_body()))
            .mount(&server)
            .await;

        let id = test_client(&server)
            .map_property_name_to_id("property2")
            .await
            .unwrap();
        assert_eq!(id, 2);
    }

    #[tokio::test]
    async fn map_property_name_to_id_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(properties_body()))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .map_property_name_to_id("property3")
            .await
            .unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::NotFound("no such property: property3".into())
        );
        assert_eq!(
            err.to_string(),
            "map property by name: not found: no such property: property3"
        );
    }

    #[tokio::test]
    async fn map_property_name_to_id_rejects_blank_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .map_property_name_to_id("")
            .await
            .unwrap_err();
        assert!(err.validation_errors().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn block_users_success() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/identity-management/v3/user-admin/properties/1/users/block"))
            .and(body_json(json!([{"uiIdentityId": "A-B-123"}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "firstName": "John",
                "isBlocked": true,
                "lastName": "Doe",
                "uiIdentityId": "A-B-123",
                "uiUserName": "jdoe"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let users = test_client(&server)
            .block_users(&BlockUsersRequest {
                property_id: 1,
                body: vec![BlockUserItem::new("A-B-123")],
            })
            .await
            .unwrap();
        assert!(users[0].is_blocked);
    }

    #[tokio::test]
    async fn block_users_with_empty_body_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .block_users(&BlockUsersRequest {
                property_id: 1,
                body: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(err.operation(), BLOCK_USERS);
        assert!(err.is_local());
    }

    struct HeaderSigner;

    impl RequestSigner for HeaderSigner {
        fn sign(
            &self,
            request: &mut reqwest::Request,
        ) -> std::result::Result<(), edgegrid_core::error::TransportError> {
            request.headers_mut().insert(
                "authorization",
                reqwest::header::HeaderValue::from_static("EG1-HMAC-SHA256 client_token=ct"),
            );
            Ok(())
        }
    }

    #[tokio::test]
    async fn builder_applies_custom_signer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/identity-management/v3/user-admin/properties/1"))
            .and(header("authorization", "EG1-HMAC-SHA256 client_token=ct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(property_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = IamClientBuilder::new(server.uri())
            .unwrap()
            .with_signer(Arc::new(HeaderSigner))
            .build()
            .unwrap();
        let property = client
            .get_property(&GetPropertyRequest {
                property_id: 1,
                group_id: 11,
            })
            .await
            .unwrap();
        assert_eq!(property.property_name, "property1");
    }
}
