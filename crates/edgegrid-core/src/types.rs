//! Core API family and operation identifiers.
//!
//! Every remote call is identified by an [`Operation`]: the API family it
//! belongs to plus a short human-readable name such as `"activate include"`.
//! Errors carry the operation so callers can tell which call failed
//! independently of why it failed.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

/// Supported API families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiFamily {
    /// Property Manager API
    Papi,
    /// Identity and Access Management API
    Iam,
    /// Cloudlets v3 API
    Cloudlets,
    /// NetStorage configuration API
    NetStorage,
}

impl ApiFamily {
    /// Returns the family name as a lowercase identifier.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Papi => "papi",
            Self::Iam => "iam",
            Self::Cloudlets => "cloudlets",
            Self::NetStorage => "netstorage",
        }
    }

    /// Returns the name used in diagnostics shown to users.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Papi => "PAPI",
            Self::Iam => "IAM",
            Self::Cloudlets => "Cloudlets",
            Self::NetStorage => "NetStorage",
        }
    }

    /// Title used when an error body could not be interpreted.
    #[must_use]
    pub const fn unparsable_error_title(&self) -> &'static str {
        match self {
            Self::Papi => {
                "Failed to unmarshal error body. PAPI API failed. Check details for more information."
            }
            Self::Iam => {
                "Failed to unmarshal error body. IAM API failed. Check details for more information."
            }
            Self::Cloudlets => {
                "Failed to unmarshal error body. Cloudlets API failed. Check details for more information."
            }
            Self::NetStorage => {
                "Failed to unmarshal error body. NetStorage API failed. Check details for more information."
            }
        }
    }

    /// Returns all known families.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Papi, Self::Iam, Self::Cloudlets, Self::NetStorage]
    }
}

impl FromStr for ApiFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "papi" => Ok(Self::Papi),
            "iam" => Ok(Self::Iam),
            "cloudlets" => Ok(Self::Cloudlets),
            "netstorage" => Ok(Self::NetStorage),
            _ => Err(ConfigError::Invalid(format!("Unknown API family: {s}"))),
        }
    }
}

impl std::fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identity of a single remote operation.
///
/// API crates declare one constant per operation; errors returned by the
/// pipeline carry it so that `err.operation() == ACTIVATE_INCLUDE` works
/// without relying on global error instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    family: ApiFamily,
    name: &'static str,
}

impl Operation {
    /// Declare an operation.
    #[must_use]
    pub const fn new(family: ApiFamily, name: &'static str) -> Self {
        Self { family, name }
    }

    /// The API family the operation belongs to.
    #[must_use]
    pub const fn family(&self) -> ApiFamily {
        self.family
    }

    /// Short operation name, e.g. `"list properties"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_names_round_trip() {
        for family in ApiFamily::all() {
            let parsed: ApiFamily = family.name().parse().unwrap();
            assert_eq!(parsed, *family);
        }
    }

    #[test]
    fn test_family_from_str_case_insensitive() {
        assert_eq!("PAPI".parse::<ApiFamily>().unwrap(), ApiFamily::Papi);
        assert_eq!("NetStorage".parse::<ApiFamily>().unwrap(), ApiFamily::NetStorage);
        assert!("dns".parse::<ApiFamily>().is_err());
    }

    #[test]
    fn test_unparsable_error_title_names_family() {
        assert_eq!(
            ApiFamily::NetStorage.unparsable_error_title(),
            "Failed to unmarshal error body. NetStorage API failed. Check details for more information."
        );
        for family in ApiFamily::all() {
            assert!(family
                .unparsable_error_title()
                .contains(family.display_name()));
        }
    }

    #[test]
    fn test_operation_display_and_equality() {
        const LIST: Operation = Operation::new(ApiFamily::Iam, "list properties");
        assert_eq!(LIST.to_string(), "list properties");
        assert_eq!(LIST.family(), ApiFamily::Iam);
        assert_ne!(LIST, Operation::new(ApiFamily::Papi, "list properties"));
    }
}
