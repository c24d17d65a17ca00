//! Cloudlets v3 client and data models.
//!
//! Covers shared policies: listing, creation, update, cloning, removal and
//! the properties a policy is active on.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{
    CloudletsClient, CloudletsClientBuilder, CLONE_POLICY, CREATE_SHARED_POLICY,
    DELETE_SHARED_POLICY, GET_SHARED_POLICY, LIST_ACTIVE_POLICY_PROPERTIES, LIST_SHARED_POLICIES,
    UPDATE_SHARED_POLICY,
};
pub use models::{
    ClonePolicyRequest, ClonePolicyRequestBody, CloudletType, CreateSharedPolicyRequest,
    DeleteSharedPolicyRequest, GetSharedPolicyRequest, ListActivePolicyPropertiesRequest,
    ListSharedPoliciesRequest, ListSharedPoliciesResponse, Policy, PolicyProperties,
    PolicyType, UpdateSharedPolicyRequest, UpdateSharedPolicyRequestBody,
};

/// Convenient result alias that reuses the shared EdgeGrid error type.
pub type Result<T> = edgegrid_core::Result<T>;
