//! Error types for the RBAC validator
//!
//! Everything here is a hard error: it aborts the validation of a rule and is
//! returned to the caller. A desired role that is simply not held is never an
//! error; it is recorded on the [`ValidationResult`](crate::result::ValidationResult).

use crate::scope::ScopeError;
use thiserror::Error;

/// RBAC validator errors
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Role reference carries neither a canonical id nor a friendly name
    #[error("Neither role name nor name specified for role")]
    MissingRoleIdentifier,

    /// Friendly role name is absent from the subscription's lookup table
    #[error("Role name {0:?} does not correspond to any built-in role")]
    UnknownRoleName(String),

    /// Grant returned by the backend has no role definition reference
    #[error("Malformed role assignment data: {0}")]
    MalformedGrant(String),

    /// Scope string could not be parsed
    #[error("Invalid scope: {0}")]
    InvalidScope(#[from] ScopeError),

    /// Principal id is not usable in a filter expression
    #[error("Invalid principal id {0:?}: expected a UUID")]
    InvalidPrincipalId(String),

    /// Role lookup table could not be obtained
    #[error("Failed to get role lookup map: {0}")]
    Lookup(String),

    /// Backend rejected or failed a request
    #[error("Azure API error: {0}")]
    Backend(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for validator operations
pub type Result<T> = std::result::Result<T, ValidatorError>;
