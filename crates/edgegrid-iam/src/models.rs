//! IAM property models.

use chrono::{DateTime, Utc};
use edgegrid_core::query::QueryParams;
use edgegrid_core::validation::{Rules, Validate, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Users who lost access when the property moved.
pub const LOST_ACCESS_USERS: &str = "lostAccess";
/// Users who gained access when the property moved.
pub const GAIN_ACCESS_USERS: &str = "gainAccess";

/// Activities available for a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyActions {
    /// The property can be moved to another group.
    #[serde(default, rename = "move")]
    pub can_move: bool,
}

/// Property as listed by IAM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Property {
    /// Property identifier.
    pub property_id: i64,
    /// Property name.
    pub property_name: String,
    /// Kind of property.
    pub property_type_description: String,
    /// Owning group identifier.
    pub group_id: i64,
    /// Owning group name.
    pub group_name: String,
    /// Available activities, when requested.
    pub actions: PropertyActions,
}

/// Parameters for listing properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListPropertiesRequest {
    /// Only list properties of this group; `0` lists all.
    pub group_id: i64,
    /// Include the available actions of each property.
    pub actions: bool,
}

impl ListPropertiesRequest {
    pub(crate) fn to_query(self) -> QueryParams {
        let mut query = QueryParams::new().with("actions", self.actions);
        query.push_opt("groupId", (self.group_id != 0).then_some(self.group_id));
        query
    }
}

/// Parameters for listing the users of a property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersForPropertyRequest {
    /// Property identifier.
    pub property_id: i64,
    /// [`LOST_ACCESS_USERS`] or [`GAIN_ACCESS_USERS`]; all users when unset.
    pub user_type: Option<String>,
}

impl ListUsersForPropertyRequest {
    pub(crate) fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        if let Some(user_type) = self.user_type.as_deref() {
            query.push_non_empty("userType", user_type);
        }
        query
    }
}

impl Validate for ListUsersForPropertyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("property_id", &self.property_id)
            .one_of(
                "user_type",
                self.user_type.as_deref(),
                &[LOST_ACCESS_USERS, GAIN_ACCESS_USERS],
            )
            .finish()
    }
}

/// A user with access to a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsersForProperty {
    /// First name.
    pub first_name: String,
    /// The user is blocked from the property.
    pub is_blocked: bool,
    /// Last name.
    pub last_name: String,
    /// Identity identifier.
    pub ui_identity_id: String,
    /// User name.
    pub ui_user_name: String,
}

/// Parameters identifying a property within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetPropertyRequest {
    /// Property identifier.
    pub property_id: i64,
    /// Group identifier.
    pub group_id: i64,
}

/// Parameters for resolving a property name from its identifier.
pub type MapPropertyIdToNameRequest = GetPropertyRequest;

impl GetPropertyRequest {
    pub(crate) fn to_query(self) -> QueryParams {
        QueryParams::new().with("groupId", self.group_id)
    }
}

impl Validate for GetPropertyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("property_id", &self.property_id)
            .required("group_id", &self.group_id)
            .finish()
    }
}

/// Property details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPropertyResponse {
    /// ARL configuration file name.
    #[serde(default)]
    pub arl_config_file: String,
    /// Creator.
    #[serde(default)]
    pub created_by: String,
    /// Creation time.
    pub created_date: DateTime<Utc>,
    /// Group identifier.
    pub group_id: i64,
    /// Group name.
    #[serde(default)]
    pub group_name: String,
    /// Last modifier.
    #[serde(default)]
    pub modified_by: String,
    /// Last modification time.
    pub modified_date: DateTime<Utc>,
    /// Property identifier.
    pub property_id: i64,
    /// Property name.
    pub property_name: String,
}

/// Groups involved in moving a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePropertyReqBody {
    /// Group to move the property to.
    pub destination_group_id: i64,
    /// Group the property currently belongs to.
    pub source_group_id: i64,
}

impl Validate for MovePropertyReqBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("destination_group_id", &self.destination_group_id)
            .required("source_group_id", &self.source_group_id)
            .finish()
    }
}

/// Parameters for moving a property between groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovePropertyRequest {
    /// Property identifier.
    pub property_id: i64,
    /// Source and destination groups.
    pub body: MovePropertyReqBody,
}

impl Validate for MovePropertyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("property_id", &self.property_id)
            .nested("body", &self.body)
            .finish()
    }
}

/// A user to block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockUserItem {
    /// Identity identifier.
    pub ui_identity_id: String,
}

impl BlockUserItem {
    /// Create an item for one identity.
    #[must_use]
    pub fn new(ui_identity_id: impl Into<String>) -> Self {
        Self {
            ui_identity_id: ui_identity_id.into(),
        }
    }
}

impl Validate for BlockUserItem {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("ui_identity_id", &self.ui_identity_id)
            .finish()
    }
}

/// Parameters for blocking users on a property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockUsersRequest {
    /// Property identifier.
    pub property_id: i64,
    /// Users to block.
    pub body: Vec<BlockUserItem>,
}

impl Validate for BlockUsersRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required("property_id", &self.property_id)
            .required("body", &self.body)
            .each("body", &self.body)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_properties_query_skips_zero_group() {
        let all = ListPropertiesRequest::default().to_query().into_pairs();
        assert_eq!(all, vec![("actions", "false".to_string())]);

        let scoped = ListPropertiesRequest {
            group_id: 12345,
            actions: true,
        }
        .to_query()
        .into_pairs();
        assert_eq!(
            scoped,
            vec![
                ("actions", "true".to_string()),
                ("groupId", "12345".to_string())
            ]
        );
    }

    #[test]
    fn user_type_must_be_known() {
        let request = ListUsersForPropertyRequest {
            property_id: 1,
            user_type: Some("everyone".into()),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(
            errors.get("user_type"),
            Some(&["must be one of: lostAccess, gainAccess".to_string()][..])
        );

        let request = ListUsersForPropertyRequest {
            property_id: 1,
            user_type: Some(GAIN_ACCESS_USERS.into()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn move_property_validates_body() {
        let request = MovePropertyRequest {
            property_id: 0,
            body: MovePropertyReqBody {
                destination_group_id: 0,
                source_group_id: 2,
            },
        };
        let fields: Vec<String> = request
            .validate()
            .unwrap_err()
            .fields()
            .map(str::to_string)
            .collect();
        assert_eq!(fields, vec!["body.destination_group_id", "property_id"]);
    }

    #[test]
    fn block_users_requires_entries() {
        let empty = BlockUsersRequest {
            property_id: 1,
            body: vec![],
        };
        assert!(empty.validate().unwrap_err().contains("body"));

        let blank = BlockUsersRequest {
            property_id: 1,
            body: vec![BlockUserItem::new("A-B-123"), BlockUserItem::new("")],
        };
        assert!(blank.validate().unwrap_err().contains("body[1].ui_identity_id"));
    }

    #[test]
    fn property_actions_use_move_key() {
        let property: Property = serde_json::from_value(json!({
            "propertyId": 1,
            "propertyName": "a",
            "actions": {"move": true}
        }))
        .unwrap();
        assert!(property.actions.can_move);
    }
}
