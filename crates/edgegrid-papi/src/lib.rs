//! PAPI client and data models.
//!
//! Provides typed structures and an asynchronous client for the Property
//! Manager API: properties and include activations.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{
    PapiClient, PapiClientBuilder, ACTIVATE_INCLUDE, CREATE_PROPERTY, DEACTIVATE_INCLUDE,
    GET_INCLUDE_ACTIVATION, GET_PROPERTIES, GET_PROPERTY, LIST_INCLUDE_ACTIVATIONS,
    REMOVE_PROPERTY,
};
pub use models::{
    ActivateIncludeRequest, ActivationIncludeResponse, ActivationNetwork, ActivationStatus,
    ActivationType, CreatePropertyRequest, CreatePropertyResponse, DeactivateIncludeRequest,
    DeactivationIncludeResponse, GetIncludeActivationRequest, GetPropertiesRequest,
    GetPropertiesResponse, GetPropertyRequest, GetPropertyResponse, IncludeActivation,
    IncludeActivationResponse, IncludeActivationsResponse, ListIncludeActivationsRequest,
    Property, PropertyCloneFrom, PropertyCreate, RemovePropertyRequest, RemovePropertyResponse,
};

/// Convenient result alias that reuses the shared EdgeGrid error type.
pub type Result<T> = edgegrid_core::Result<T>;
