//! Cloudlets v3 shared policy models.

use chrono::{DateTime, Utc};
use edgegrid_core::query::QueryParams;
use edgegrid_core::validation::{Rules, Validate, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted policy name.
pub const MAX_POLICY_NAME_LEN: usize = 64;
/// Longest accepted policy description.
pub const MAX_DESCRIPTION_LEN: usize = 255;
/// Smallest accepted page size.
pub const MIN_PAGE_SIZE: i64 = 10;

const NAME_PATTERN_MESSAGE: &str = "may only contain letters, digits and underscores";

/// Cloudlet a policy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudletType {
    /// API Prioritization.
    #[serde(rename = "AP")]
    ApiPrioritization,
    /// Audience Segmentation.
    #[serde(rename = "AS")]
    AudienceSegmentation,
    /// Phased Release.
    #[serde(rename = "CD")]
    PhasedRelease,
    /// Edge Redirector.
    #[serde(rename = "ER")]
    EdgeRedirector,
    /// Forward Rewrite.
    #[serde(rename = "FR")]
    ForwardRewrite,
    /// Request Control.
    #[serde(rename = "IG")]
    RequestControl,
}

impl CloudletType {
    /// Two-letter code used on the wire.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ApiPrioritization => "AP",
            Self::AudienceSegmentation => "AS",
            Self::PhasedRelease => "CD",
            Self::EdgeRedirector => "ER",
            Self::ForwardRewrite => "FR",
            Self::RequestControl => "IG",
        }
    }
}

impl fmt::Display for CloudletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Kind of policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    /// Policy shared through the v3 API.
    #[default]
    Shared,
}

/// Network an activation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Network {
    /// Staging network.
    Staging,
    /// Production network.
    Production,
}

/// Activation or deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyActivationOperation {
    /// Activation.
    Activation,
    /// Deactivation.
    Deactivation,
}

/// State of a policy activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStatus {
    /// Still running.
    InProgress,
    /// Completed.
    Success,
    /// Failed.
    Failed,
}

/// Hypermedia link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target.
    pub href: String,
    /// Relation.
    pub rel: String,
}

/// Paging details of a list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Page {
    /// Page index, starting at 0.
    pub number: i64,
    /// Page size.
    pub size: i64,
    /// Elements across all pages.
    pub total_elements: i64,
    /// Number of pages.
    pub total_pages: i64,
}

/// One activation of a policy version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyActivation {
    /// Requester.
    #[serde(default)]
    pub created_by: String,
    /// When it was requested.
    pub created_date: DateTime<Utc>,
    /// When it finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_date: Option<DateTime<Utc>>,
    /// Activation identifier.
    pub id: i64,
    /// Links.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Target network.
    pub network: Network,
    /// Activation or deactivation.
    pub operation: PolicyActivationOperation,
    /// Policy identifier.
    pub policy_id: i64,
    /// Activated policy version.
    pub policy_version: i64,
    /// The activated version has since been deleted.
    #[serde(default)]
    pub policy_version_deleted: bool,
    /// Current state.
    pub status: ActivationStatus,
}

/// Effective and latest activation on one network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationInfo {
    /// Activation currently serving traffic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective: Option<PolicyActivation>,
    /// Most recent activation request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<PolicyActivation>,
}

/// Activation state on both networks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentActivations {
    /// Production network.
    pub production: ActivationInfo,
    /// Staging network.
    pub staging: ActivationInfo,
}

/// Shared policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Cloudlet type.
    pub cloudlet_type: CloudletType,
    /// Creator.
    #[serde(default)]
    pub created_by: String,
    /// Creation time.
    pub created_date: DateTime<Utc>,
    /// Activation state.
    #[serde(default)]
    pub current_activations: CurrentActivations,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Group identifier.
    pub group_id: i64,
    /// Policy identifier.
    pub id: i64,
    /// Links.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Last modifier.
    #[serde(default)]
    pub modified_by: String,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<DateTime<Utc>>,
    /// Policy name.
    pub name: String,
    /// Policy type.
    #[serde(default)]
    pub policy_type: PolicyType,
}

fn check_policy_name(rules: Rules, field: &str, name: &str) -> Rules {
    rules
        .required(field, name)
        .max_len(field, Some(name), MAX_POLICY_NAME_LEN)
        .check(
            field,
            name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
            NAME_PATTERN_MESSAGE,
        )
}

fn check_paging(rules: Rules, page: Option<i64>, size: Option<i64>) -> Rules {
    rules
        .min_value("page", page, 0)
        .min_value("size", size, MIN_PAGE_SIZE)
}

fn paging_query(page: Option<i64>, size: Option<i64>) -> QueryParams {
    let mut query = QueryParams::new();
    query.push_opt("page", page);
    query.push_opt("size", size);
    query
}

/// Parameters for listing shared policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListSharedPoliciesRequest {
    /// Page index, starting at 0.
    pub page: Option<i64>,
    /// Page size, at least [`MIN_PAGE_SIZE`].
    pub size: Option<i64>,
}

impl ListSharedPoliciesRequest {
    pub(crate) fn to_query(self) -> QueryParams {
        paging_query(self.page, self.size)
    }
}

impl Validate for ListSharedPoliciesRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_paging(Rules::new(), self.page, self.size).finish()
    }
}

/// One page of shared policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSharedPoliciesResponse {
    /// Policies on this page.
    #[serde(default)]
    pub content: Vec<Policy>,
    /// Paging links.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Paging details.
    #[serde(default)]
    pub page: Page,
}

/// Parameters for creating a shared policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSharedPolicyRequest {
    /// Policy name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Group identifier.
    pub group_id: i64,
    /// Cloudlet type.
    pub cloudlet_type: CloudletType,
    /// Always [`PolicyType::Shared`].
    pub policy_type: PolicyType,
}

impl CreateSharedPolicyRequest {
    /// Create a request with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, group_id: i64, cloudlet_type: CloudletType) -> Self {
        Self {
            name: name.into(),
            description: None,
            group_id,
            cloudlet_type,
            policy_type: PolicyType::Shared,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Validate for CreateSharedPolicyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_policy_name(Rules::new(), "name", &self.name)
            .max_len(
                "description",
                self.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )
            .required("group_id", &self.group_id)
            .finish()
    }
}

/// Parameters identifying a shared policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyRequest {
    /// Policy identifier.
    pub policy_id: i64,
}

/// Parameters for fetching a shared policy.
pub type GetSharedPolicyRequest = PolicyRequest;
/// Parameters for deleting a shared policy.
pub type DeleteSharedPolicyRequest = PolicyRequest;

impl Validate for PolicyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new().required("policy_id", &self.policy_id).finish()
    }
}

/// New settings of a shared policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSharedPolicyRequestBody {
    /// Group identifier.
    pub group_id: i64,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for UpdateSharedPolicyRequestBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("group_id", &self.group_id)
            .max_len(
                "description",
                self.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )
            .finish()
    }
}

/// Parameters for updating a shared policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSharedPolicyRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// New settings.
    pub body: UpdateSharedPolicyRequestBody,
}

impl Validate for UpdateSharedPolicyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("policy_id", &self.policy_id)
            .nested("body", &self.body)
            .finish()
    }
}

/// Settings of a policy clone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClonePolicyRequestBody {
    /// Versions to clone besides staging, production and the latest.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_versions: Vec<i64>,
    /// Group of the clone; the source group when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    /// Name of the clone.
    pub new_name: String,
}

impl Validate for ClonePolicyRequestBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_policy_name(Rules::new(), "new_name", &self.new_name).finish()
    }
}

/// Parameters for cloning a policy into a new shared policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClonePolicyRequest {
    /// Policy to clone.
    pub policy_id: i64,
    /// Clone settings.
    pub body: ClonePolicyRequestBody,
}

impl Validate for ClonePolicyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("policy_id", &self.policy_id)
            .nested("body", &self.body)
            .finish()
    }
}

/// Parameters for listing properties where a policy is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListActivePolicyPropertiesRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Page index, starting at 0.
    pub page: Option<i64>,
    /// Page size, at least [`MIN_PAGE_SIZE`].
    pub size: Option<i64>,
}

impl ListActivePolicyPropertiesRequest {
    pub(crate) fn to_query(self) -> QueryParams {
        paging_query(self.page, self.size)
    }
}

impl Validate for ListActivePolicyPropertiesRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_paging(Rules::new(), self.page, self.size)
            .required("policy_id", &self.policy_id)
            .finish()
    }
}

/// Property where a policy is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPropertyItem {
    /// Group identifier.
    pub group_id: i64,
    /// Property identifier.
    pub id: i64,
    /// Property name.
    pub name: String,
    /// Network the property is active on.
    pub network: Network,
    /// Active property version.
    pub version: i64,
}

/// One page of properties where a policy is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyProperties {
    /// Properties on this page.
    pub content: Vec<PolicyPropertyItem>,
    /// Paging links.
    pub links: Vec<Link>,
    /// Paging details.
    pub page: Page,
}
