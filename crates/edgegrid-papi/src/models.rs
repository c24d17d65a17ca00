//! PAPI request and response models.

use chrono::{DateTime, Utc};
use edgegrid_core::link::LinkedResponse;
use edgegrid_core::query::QueryParams;
use edgegrid_core::validation::{Rules, Validate, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Network an activation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationNetwork {
    /// Staging network.
    Staging,
    /// Production network.
    Production,
}

/// Whether an activation turns a version on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationType {
    /// Activate a version.
    Activate,
    /// Deactivate a version.
    Deactivate,
}

/// Lifecycle state of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStatus {
    /// Live on the network.
    Active,
    /// Replaced by a later activation.
    Inactive,
    /// Accepted, not yet processed.
    New,
    /// Waiting to be processed.
    Pending,
    /// Propagating, first zone.
    #[serde(rename = "ZONE_1")]
    Zone1,
    /// Propagating, second zone.
    #[serde(rename = "ZONE_2")]
    Zone2,
    /// Propagating, third zone.
    #[serde(rename = "ZONE_3")]
    Zone3,
    /// Stopped before completion.
    Aborted,
    /// Failed to activate.
    Failed,
    /// Deactivation in progress.
    PendingDeactivation,
    /// Deactivated.
    Deactivated,
    /// Cancellation in progress.
    PendingCancellation,
    /// Any state this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Kind of include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncludeType {
    /// Include owned by a microservice team.
    #[serde(rename = "MICROSERVICES")]
    MicroServices,
    /// Include shared across properties.
    #[serde(rename = "COMMON_SETTINGS")]
    CommonSettings,
}

/// Property as returned by PAPI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Property {
    /// Account identifier.
    pub account_id: String,
    /// Asset identifier.
    pub asset_id: String,
    /// Contract identifier.
    pub contract_id: String,
    /// Group identifier.
    pub group_id: String,
    /// Most recent version number.
    pub latest_version: u32,
    /// Free-form note.
    pub note: String,
    /// Product identifier.
    pub product_id: String,
    /// Version active on production, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_version: Option<u32>,
    /// Property identifier.
    pub property_id: String,
    /// Property name.
    pub property_name: String,
    /// Rule format.
    pub rule_format: String,
    /// Version active on staging, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_version: Option<u32>,
}

/// Wrapper around a list of properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertiesItems {
    /// Properties.
    #[serde(default)]
    pub items: Vec<Property>,
}

/// Parameters for listing properties of a contract and group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPropertiesRequest {
    /// Contract identifier.
    pub contract_id: String,
    /// Group identifier.
    pub group_id: String,
}

impl GetPropertiesRequest {
    pub(crate) fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("contractId", &self.contract_id)
            .with("groupId", &self.group_id)
    }
}

impl Validate for GetPropertiesRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("contract_id", &self.contract_id)
            .required("group_id", &self.group_id)
            .finish()
    }
}

/// Properties of a contract and group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPropertiesResponse {
    /// Properties.
    #[serde(default)]
    pub properties: PropertiesItems,
}

/// Property to clone settings from when creating a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCloneFrom {
    /// Etag of the version to clone; cloning fails if it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_from_version_etag: Option<String>,
    /// Also copy the hostnames.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub copy_hostnames: bool,
    /// Property to clone.
    pub property_id: String,
    /// Version to clone.
    pub version: u32,
}

/// Body of a create property request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCreate {
    /// Optional property to clone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_from: Option<PropertyCloneFrom>,
    /// Product identifier.
    pub product_id: String,
    /// Property name.
    pub property_name: String,
    /// Rule format, latest when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_format: Option<String>,
}

impl Validate for PropertyCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("product_id", &self.product_id)
            .required("property_name", &self.property_name)
            .finish()
    }
}

/// Parameters for creating a property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePropertyRequest {
    /// Contract identifier.
    pub contract_id: String,
    /// Group identifier.
    pub group_id: String,
    /// Property to create.
    pub property: PropertyCreate,
}

impl CreatePropertyRequest {
    pub(crate) fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("contractId", &self.contract_id)
            .with("groupId", &self.group_id)
    }
}

impl Validate for CreatePropertyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("contract_id", &self.contract_id)
            .required("group_id", &self.group_id)
            .nested("property", &self.property)
            .finish()
    }
}

/// Result of creating a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyResponse {
    /// Link to the new property.
    pub property_link: String,
    /// Identifier resolved from [`Self::property_link`].
    #[serde(skip)]
    pub property_id: String,
}

impl LinkedResponse for CreatePropertyResponse {
    fn response_link(&self) -> &str {
        &self.property_link
    }

    fn attach_id(&mut self, id: String) {
        self.property_id = id;
    }
}

/// Parameters identifying a single property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPropertyRequest {
    /// Property identifier.
    pub property_id: String,
    /// Optional contract identifier.
    pub contract_id: Option<String>,
    /// Optional group identifier.
    pub group_id: Option<String>,
}

/// Parameters for removing a property.
pub type RemovePropertyRequest = GetPropertyRequest;

impl GetPropertyRequest {
    pub(crate) fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_non_empty("contractId", self.contract_id.as_deref().unwrap_or_default());
        query.push_non_empty("groupId", self.group_id.as_deref().unwrap_or_default());
        query
    }
}

impl Validate for GetPropertyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("property_id", &self.property_id)
            .finish()
    }
}

/// A single property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetPropertyResponse {
    /// Account identifier.
    pub account_id: String,
    /// Contract identifier.
    pub contract_id: String,
    /// Group identifier.
    pub group_id: String,
    /// Matching properties, normally exactly one.
    pub properties: PropertiesItems,
    /// First entry of [`Self::properties`], if any.
    #[serde(skip)]
    pub property: Option<Property>,
}

/// Result of removing a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovePropertyResponse {
    /// Confirmation message.
    #[serde(default)]
    pub message: String,
}

/// Parameters for activating or deactivating an include version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateIncludeRequest {
    /// Include identifier.
    pub include_id: String,
    /// Include version.
    pub version: u32,
    /// Target network.
    pub network: ActivationNetwork,
    /// Activation note.
    pub note: String,
    /// Addresses notified about progress.
    pub notify_emails: Vec<String>,
    /// Warning identifiers to acknowledge.
    pub acknowledge_warnings: Vec<String>,
    /// Acknowledge every warning.
    pub acknowledge_all_warnings: bool,
    /// Continue despite HTTP errors during validation; `true` when unset.
    pub ignore_http_errors: Option<bool>,
}

/// Parameters for deactivating an include version.
pub type DeactivateIncludeRequest = ActivateIncludeRequest;

impl ActivateIncludeRequest {
    /// Create a request with the required fields.
    #[must_use]
    pub fn new(
        include_id: impl Into<String>,
        version: u32,
        network: ActivationNetwork,
        notify_emails: Vec<String>,
    ) -> Self {
        Self {
            include_id: include_id.into(),
            version,
            network,
            note: String::new(),
            notify_emails,
            acknowledge_warnings: Vec::new(),
            acknowledge_all_warnings: false,
            ignore_http_errors: None,
        }
    }

    /// Set the activation note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub(crate) fn body(&self, activation_type: ActivationType) -> IncludeActivationBody<'_> {
        IncludeActivationBody {
            include_version: self.version,
            network: self.network,
            note: &self.note,
            notify_emails: &self.notify_emails,
            acknowledge_warnings: &self.acknowledge_warnings,
            acknowledge_all_warnings: self.acknowledge_all_warnings,
            ignore_http_errors: self.ignore_http_errors.unwrap_or(true),
            activation_type,
        }
    }
}

impl Validate for ActivateIncludeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("include_id", &self.include_id)
            .non_zero("version", self.version)
            .required("notify_emails", &self.notify_emails)
            .finish()
    }
}

fn is_empty_slice(values: &&[String]) -> bool {
    values.is_empty()
}

/// Wire body of an include activation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IncludeActivationBody<'a> {
    include_version: u32,
    network: ActivationNetwork,
    note: &'a str,
    notify_emails: &'a [String],
    #[serde(skip_serializing_if = "is_empty_slice")]
    acknowledge_warnings: &'a [String],
    acknowledge_all_warnings: bool,
    ignore_http_errors: bool,
    activation_type: ActivationType,
}

/// Result of activating or deactivating an include.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationIncludeResponse {
    /// Link to the activation.
    pub activation_link: String,
    /// Identifier resolved from [`Self::activation_link`].
    #[serde(skip)]
    pub activation_id: String,
}

/// Result of deactivating an include.
pub type DeactivationIncludeResponse = ActivationIncludeResponse;

impl LinkedResponse for ActivationIncludeResponse {
    fn response_link(&self) -> &str {
        &self.activation_link
    }

    fn attach_id(&mut self, id: String) {
        self.activation_id = id;
    }
}

/// Parameters identifying one include activation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetIncludeActivationRequest {
    /// Include identifier.
    pub include_id: String,
    /// Activation identifier.
    pub activation_id: String,
}

impl Validate for GetIncludeActivationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("include_id", &self.include_id)
            .required("activation_id", &self.activation_id)
            .finish()
    }
}

/// Parameters for listing the activations of an include.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListIncludeActivationsRequest {
    /// Include identifier.
    pub include_id: String,
    /// Contract identifier.
    pub contract_id: String,
    /// Group identifier.
    pub group_id: String,
}

impl ListIncludeActivationsRequest {
    pub(crate) fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("contractId", &self.contract_id)
            .with("groupId", &self.group_id)
    }
}

impl Validate for ListIncludeActivationsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("include_id", &self.include_id)
            .required("contract_id", &self.contract_id)
            .required("group_id", &self.group_id)
            .finish()
    }
}

/// Fast fallback details of an activation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivationFallbackInfo {
    /// Whether a fast fallback was attempted.
    pub fast_fallback_attempted: bool,
    /// Version to fall back to.
    pub fallback_version: u32,
    /// Whether a fast fallback is possible.
    pub can_fast_fallback: bool,
    /// When the activation reached steady state (epoch seconds).
    pub steady_state_time: i64,
    /// When fast fallback stops being available (epoch seconds).
    pub fast_fallback_expiration_time: i64,
    /// Recovery state after a fast fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fast_fallback_recovery_state: Option<String>,
}

/// One include activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeActivation {
    /// Activation identifier.
    pub activation_id: String,
    /// Target network.
    pub network: ActivationNetwork,
    /// Activation or deactivation.
    pub activation_type: ActivationType,
    /// Current state.
    pub status: ActivationStatus,
    /// When the activation was submitted.
    pub submit_date: DateTime<Utc>,
    /// When the activation last changed.
    pub update_date: DateTime<Utc>,
    /// Activation note.
    #[serde(default)]
    pub note: String,
    /// Addresses notified about progress.
    #[serde(default)]
    pub notify_emails: Vec<String>,
    /// Fast metadata activation state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fma_activation_state: Option<String>,
    /// Fast fallback details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_info: Option<ActivationFallbackInfo>,
    /// Include identifier.
    pub include_id: String,
    /// Include name.
    #[serde(default)]
    pub include_name: String,
    /// Kind of include.
    pub include_type: IncludeType,
    /// Activated include version.
    pub include_version: u32,
    /// Include activation identifier.
    #[serde(default)]
    pub include_activation_id: String,
}

/// Wrapper around a list of include activations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeActivations {
    /// Activations.
    #[serde(default)]
    pub items: Vec<IncludeActivation>,
}

/// Summary of activation validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Completion percentage.
    pub complete_percent: f64,
    /// Validation found errors.
    pub has_validation_error: bool,
    /// Validation found warnings.
    pub has_validation_warning: bool,
    /// Validation hit a system error.
    pub has_system_error: bool,
    /// Validation hit a client error.
    pub has_client_error: bool,
    /// Message state.
    pub message_state: String,
}

/// Property version failing validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorItem {
    /// Version identifier.
    pub version_id: u64,
    /// Property name.
    pub property_name: String,
    /// Version number.
    pub version_number: u32,
    /// Version has validation errors.
    pub has_validation_error: bool,
    /// Version has validation warnings.
    pub has_validation_warning: bool,
    /// Link to the validation results.
    pub validation_results_link: String,
}

/// Progress of activation validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationProgress {
    /// Failing versions.
    #[serde(default, rename = "errorItemsList")]
    pub error_items: Vec<ErrorItem>,
}

/// Validation state of a pending include activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validations {
    /// Summary.
    #[serde(default)]
    pub validation_summary: ValidationSummary,
    /// Progress.
    #[serde(default)]
    pub validation_progress_item_list: ValidationProgress,
    /// Network being validated.
    pub network: ActivationNetwork,
}

/// One include activation with its context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeActivationResponse {
    /// Account identifier.
    #[serde(default)]
    pub account_id: String,
    /// Contract identifier.
    #[serde(default)]
    pub contract_id: String,
    /// Group identifier.
    #[serde(default)]
    pub group_id: String,
    /// Activations.
    #[serde(default)]
    pub activations: IncludeActivations,
    /// Validation state, while validation runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validations: Option<Validations>,
}

/// All activations of an include.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncludeActivationsResponse {
    /// Account identifier.
    pub account_id: String,
    /// Contract identifier.
    pub contract_id: String,
    /// Group identifier.
    pub group_id: String,
    /// Activations.
    pub activations: IncludeActivations,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn activation() -> ActivateIncludeRequest {
        ActivateIncludeRequest::new(
            "inc_12345",
            4,
            ActivationNetwork::Staging,
            vec!["jbond@example.com".into()],
        )
        .with_note("test activation")
    }

    #[test]
    fn activation_body_defaults_ignore_http_errors() {
        let body = serde_json::to_value(activation().body(ActivationType::Activate)).unwrap();
        assert_eq!(
            body,
            json!({
                "includeVersion": 4,
                "network": "STAGING",
                "note": "test activation",
                "notifyEmails": ["jbond@example.com"],
                "acknowledgeAllWarnings": false,
                "ignoreHttpErrors": true,
                "activationType": "ACTIVATE"
            })
        );
    }

    #[test]
    fn activation_body_keeps_explicit_values() {
        let request = ActivateIncludeRequest {
            acknowledge_warnings: vec!["msg_1".into()],
            ignore_http_errors: Some(false),
            ..activation()
        };

        let body = serde_json::to_value(request.body(ActivationType::Deactivate)).unwrap();
        assert_eq!(body["acknowledgeWarnings"], json!(["msg_1"]));
        assert_eq!(body["ignoreHttpErrors"], json!(false));
        assert_eq!(body["activationType"], json!("DEACTIVATE"));
    }

    #[test]
    fn activation_validation_reports_every_field() {
        let request = ActivateIncludeRequest::new("", 0, ActivationNetwork::Production, vec![]);
        let errors = request.validate().unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["include_id", "notify_emails", "version"]);
    }

    #[test]
    fn create_property_validation_is_nested() {
        let request = CreatePropertyRequest {
            contract_id: "ctr_1".into(),
            group_id: "grp_1".into(),
            property: PropertyCreate::default(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.contains("property.product_id"));
        assert!(errors.contains("property.property_name"));
    }

    #[test]
    fn property_create_omits_unset_fields() {
        let body = serde_json::to_value(PropertyCreate {
            product_id: "prd_Web_Accel".into(),
            property_name: "my.new.property.com".into(),
            clone_from: Some(PropertyCloneFrom {
                property_id: "prp_1".into(),
                version: 2,
                ..PropertyCloneFrom::default()
            }),
            rule_format: None,
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "cloneFrom": {"propertyId": "prp_1", "version": 2},
                "productId": "prd_Web_Accel",
                "propertyName": "my.new.property.com"
            })
        );
    }

    #[test]
    fn get_property_query_skips_absent_ids() {
        let request = GetPropertyRequest {
            property_id: "prp_175780".into(),
            contract_id: None,
            group_id: Some("grp_15225".into()),
        };
        assert_eq!(
            request.to_query().into_pairs(),
            vec![("groupId", "grp_15225".to_string())]
        );
    }

    #[test]
    fn get_property_query_skips_empty_ids() {
        let request = GetPropertyRequest {
            property_id: "prp_175780".into(),
            contract_id: Some(String::new()),
            group_id: Some(String::new()),
        };
        assert!(request.to_query().is_empty());

        let request = GetPropertyRequest {
            contract_id: Some("ctr_1".into()),
            ..request
        };
        assert_eq!(
            request.to_query().into_pairs(),
            vec![("contractId", "ctr_1".to_string())]
        );
    }

    #[test]
    fn unknown_activation_status_is_tolerated() {
        let status: ActivationStatus = serde_json::from_value(json!("SOMETHING_NEW")).unwrap();
        assert_eq!(status, ActivationStatus::Unknown);
        let zone: ActivationStatus = serde_json::from_value(json!("ZONE_2")).unwrap();
        assert_eq!(zone, ActivationStatus::Zone2);
    }
}
