//! IAM client and data models.
//!
//! Covers the user-admin property endpoints of the Identity and Access
//! Management API: listing and moving properties, their users, and the
//! name/identifier lookups built on top of them.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{
    IamClient, IamClientBuilder, BLOCK_USERS, GET_PROPERTY, LIST_PROPERTIES,
    LIST_USERS_FOR_PROPERTY, MAP_PROPERTY_ID_TO_NAME, MAP_PROPERTY_NAME_TO_ID, MOVE_PROPERTY,
};
pub use models::{
    BlockUserItem, BlockUsersRequest, GetPropertyRequest, GetPropertyResponse,
    ListPropertiesRequest, ListUsersForPropertyRequest, MapPropertyIdToNameRequest,
    MovePropertyReqBody, MovePropertyRequest, Property, PropertyActions, UsersForProperty,
    GAIN_ACCESS_USERS, LOST_ACCESS_USERS,
};

/// Convenient result alias that reuses the shared EdgeGrid error type.
pub type Result<T> = edgegrid_core::Result<T>;
