//! Role assignment API facade
//!
//! The validators only see this narrow interface, never a concrete client.
//! Implementations drain every result page before returning.

use crate::error::{Result, ValidatorError};
use crate::types::Grant;
use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

/// `principalId eq '<id>'` filter for role assignment queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalFilter {
    principal_id: Uuid,
}

impl PrincipalFilter {
    /// Builds a filter for `principal_id`, which must be a UUID so it can be
    /// interpolated into the filter expression safely.
    pub fn new(principal_id: &str) -> Result<Self> {
        let principal_id = Uuid::parse_str(principal_id)
            .map_err(|_| ValidatorError::InvalidPrincipalId(principal_id.to_string()))?;
        Ok(Self { principal_id })
    }

    pub fn principal_id(&self) -> &Uuid {
        &self.principal_id
    }
}

impl fmt::Display for PrincipalFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "principalId eq '{}'", self.principal_id)
    }
}

/// Operations against the role assignments API
#[async_trait]
pub trait RoleAssignmentApi: Send + Sync {
    /// Every role assignment in a subscription matching `filter`
    async fn list_for_subscription(
        &self,
        subscription_id: &str,
        filter: &PrincipalFilter,
    ) -> Result<Vec<Grant>>;

    /// Every role assignment applying at `scope` matching `filter`, including
    /// assignments inherited from enclosing scopes
    async fn list_for_scope(&self, scope: &str, filter: &PrincipalFilter) -> Result<Vec<Grant>>;
}
