//! Multi-scope RBAC validation

use crate::api::{PrincipalFilter, RoleAssignmentApi};
use crate::check::{ScopeGrants, ScopeTarget};
use crate::error::Result;
use crate::result::{ValidationResult, VALIDATION_TYPE_RBAC};
use crate::role::RoleLookupProvider;
use crate::types::{PermissionSet, RbacRule};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Validates [`RbacRule`]s
#[derive(Clone)]
pub struct RbacRuleService {
    api: Arc<dyn RoleAssignmentApi>,
    lookup: Arc<dyn RoleLookupProvider>,
}

impl RbacRuleService {
    pub fn new(api: Arc<dyn RoleAssignmentApi>, lookup: Arc<dyn RoleLookupProvider>) -> Self {
        Self { api, lookup }
    }

    /// Checks every permission set of the rule against its own scope.
    ///
    /// Missing roles accumulate across sets; the first error stops
    /// processing of the remaining sets.
    pub async fn reconcile(&self, rule: &RbacRule) -> Result<ValidationResult> {
        let result = ValidationResult::succeeded(VALIDATION_TYPE_RBAC, &rule.security_principal_id);
        let filter = PrincipalFilter::new(&rule.security_principal_id)?;

        let mut failures = Vec::new();
        for (i, set) in rule.permissions.iter().enumerate() {
            debug!(set = i + 1, scope = %set.scope, "Processing permission set");
            if let Some(failure) = self.process_permission_set(set, &filter).await? {
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            info!(
                principal_id = %rule.security_principal_id,
                sets = rule.permissions.len(),
                "RBAC rule passed"
            );
        } else {
            warn!(
                principal_id = %rule.security_principal_id,
                missing = failures.len(),
                "RBAC rule failed"
            );
        }

        Ok(result.conclude(failures))
    }

    /// Returns a failure message if the set's role is not held at its scope
    async fn process_permission_set(
        &self,
        set: &PermissionSet,
        filter: &PrincipalFilter,
    ) -> Result<Option<String>> {
        let grants =
            ScopeGrants::fetch(self.api.as_ref(), ScopeTarget::Scope(&set.scope), filter).await?;

        let missing = grants.missing_role(&set.role, self.lookup.as_ref()).await?;
        Ok(missing.map(|role| format!("missing role {} at scope {}", role, grants.scope())))
    }
}
