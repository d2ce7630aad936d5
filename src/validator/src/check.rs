//! Per-scope role check shared by both validators
//!
//! One fetch of a principal's role assignments at a scope, followed by any
//! number of membership checks against it. The single-subscription validator
//! fetches once and checks many roles; the multi-scope validator fetches once
//! per permission set and checks one role.

use crate::api::{PrincipalFilter, RoleAssignmentApi};
use crate::error::Result;
use crate::grants::grant_set;
use crate::role::{resolve_role, RoleLookupProvider};
use crate::scope::subscription_from_scope;
use crate::types::RoleReference;
use std::collections::HashSet;
use tracing::debug;

/// Where role assignments are fetched from
#[derive(Debug, Clone, Copy)]
pub enum ScopeTarget<'a> {
    /// Anywhere within a subscription
    Subscription(&'a str),
    /// At an ARM scope, including inherited assignments
    Scope(&'a str),
}

/// Canonical role names a principal holds at one scope
#[derive(Debug, Clone)]
pub struct ScopeGrants {
    scope: String,
    subscription_id: String,
    held: HashSet<String>,
}

impl ScopeGrants {
    /// Fetches the principal's role assignments at `target`.
    ///
    /// For [`ScopeTarget::Scope`] the subscription is parsed out of the scope
    /// before anything is fetched.
    pub async fn fetch(
        api: &dyn RoleAssignmentApi,
        target: ScopeTarget<'_>,
        filter: &PrincipalFilter,
    ) -> Result<Self> {
        let (scope, subscription_id, grants) = match target {
            ScopeTarget::Subscription(subscription_id) => {
                let grants = api.list_for_subscription(subscription_id, filter).await?;
                (
                    format!("/subscriptions/{}", subscription_id),
                    subscription_id.to_string(),
                    grants,
                )
            }
            ScopeTarget::Scope(scope) => {
                let subscription_id = subscription_from_scope(scope)?;
                let grants = api.list_for_scope(scope, filter).await?;
                (scope.to_string(), subscription_id, grants)
            }
        };

        let held = grant_set(&grants)?;
        debug!(
            scope = %scope,
            principal_id = %filter.principal_id(),
            assignments = grants.len(),
            roles = held.len(),
            "Fetched role assignments"
        );

        Ok(Self {
            scope,
            subscription_id,
            held,
        })
    }

    /// Builds the set directly from held role names
    pub fn from_held<I, S>(scope: &str, subscription_id: &str, held: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope: scope.to_string(),
            subscription_id: subscription_id.to_string(),
            held: held.into_iter().map(Into::into).collect(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn holds(&self, role: &str) -> bool {
        self.held.contains(role)
    }

    /// Resolves `reference` and returns its canonical name if it is not held.
    ///
    /// Resolution errors are returned as errors, never as a missing role.
    pub async fn missing_role(
        &self,
        reference: &RoleReference,
        lookup: &dyn RoleLookupProvider,
    ) -> Result<Option<String>> {
        let role = resolve_role(reference, &self.subscription_id, lookup).await?;
        if self.holds(&role) {
            debug!(scope = %self.scope, role = %role, "Required role found");
            Ok(None)
        } else {
            debug!(scope = %self.scope, role = %role, label = reference.label(), "Required role missing");
            Ok(Some(role))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidatorError;
    use crate::role::StaticRoleLookup;

    #[tokio::test]
    async fn test_missing_role_checks_membership() {
        let grants = ScopeGrants::from_held("/subscriptions/s", "s", ["a", "c"]);
        let lookup = StaticRoleLookup::new([("Reader", "c"), ("Owner", "o")]);

        assert_eq!(grants.missing_role(&RoleReference::canonical("a"), &lookup).await.unwrap(), None);
        assert_eq!(
            grants.missing_role(&RoleReference::canonical("b"), &lookup).await.unwrap(),
            Some("b".to_string())
        );
        assert_eq!(grants.missing_role(&RoleReference::friendly("Reader"), &lookup).await.unwrap(), None);
        assert_eq!(
            grants.missing_role(&RoleReference::friendly("Owner"), &lookup).await.unwrap(),
            Some("o".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_role_propagates_resolution_error() {
        let grants = ScopeGrants::from_held("/subscriptions/s", "s", ["a"]);
        let lookup = StaticRoleLookup::default();

        let err = grants
            .missing_role(&RoleReference::Unspecified, &lookup)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::MissingRoleIdentifier));
    }
}
