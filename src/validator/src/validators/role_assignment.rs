//! Single-subscription role assignment validation

use crate::api::{PrincipalFilter, RoleAssignmentApi};
use crate::check::{ScopeGrants, ScopeTarget};
use crate::error::Result;
use crate::result::{ValidationResult, VALIDATION_TYPE_ROLE_ASSIGNMENT};
use crate::role::RoleLookupProvider;
use crate::types::RoleAssignmentRule;
use std::sync::Arc;
use tracing::{info, warn};

/// Validates [`RoleAssignmentRule`]s
#[derive(Clone)]
pub struct RoleAssignmentRuleService {
    api: Arc<dyn RoleAssignmentApi>,
    lookup: Arc<dyn RoleLookupProvider>,
}

impl RoleAssignmentRuleService {
    pub fn new(api: Arc<dyn RoleAssignmentApi>, lookup: Arc<dyn RoleLookupProvider>) -> Self {
        Self { api, lookup }
    }

    /// Checks that the rule's service principal holds every desired role
    /// somewhere in the rule's subscription.
    ///
    /// Every missing role is recorded as a failure. Errors fetching
    /// assignments or resolving a role abort the whole rule.
    pub async fn reconcile(&self, rule: &RoleAssignmentRule) -> Result<ValidationResult> {
        let result =
            ValidationResult::succeeded(VALIDATION_TYPE_ROLE_ASSIGNMENT, &rule.service_principal_id);

        let filter = PrincipalFilter::new(&rule.service_principal_id)?;
        let grants = ScopeGrants::fetch(
            self.api.as_ref(),
            ScopeTarget::Subscription(&rule.subscription_id),
            &filter,
        )
        .await?;

        let mut failures = Vec::new();
        for role in &rule.roles {
            if let Some(missing) = grants.missing_role(role, self.lookup.as_ref()).await? {
                failures.push(format!("missing role {}", missing));
            }
        }

        if failures.is_empty() {
            info!(
                principal_id = %rule.service_principal_id,
                subscription_id = %rule.subscription_id,
                roles = rule.roles.len(),
                "Role assignment rule passed"
            );
        } else {
            warn!(
                principal_id = %rule.service_principal_id,
                subscription_id = %rule.subscription_id,
                missing = failures.len(),
                "Role assignment rule failed"
            );
        }

        Ok(result.conclude(failures))
    }
}
