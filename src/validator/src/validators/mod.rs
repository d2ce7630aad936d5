//! Rule validators
//!
//! Both validators share the injected role assignment API and role lookup
//! provider. [`SpecValidator`] runs every rule of an [`AzureValidatorSpec`].

pub mod rbac;
pub mod role_assignment;

pub use rbac::RbacRuleService;
pub use role_assignment::RoleAssignmentRuleService;

use crate::api::RoleAssignmentApi;
use crate::error::Result;
use crate::result::ValidationResult;
use crate::role::RoleLookupProvider;
use crate::types::AzureValidatorSpec;
use futures::future::join_all;
use std::sync::Arc;

/// Validates all rules of a spec
#[derive(Clone)]
pub struct SpecValidator {
    role_assignments: RoleAssignmentRuleService,
    rbac: RbacRuleService,
}

impl SpecValidator {
    pub fn new(api: Arc<dyn RoleAssignmentApi>, lookup: Arc<dyn RoleLookupProvider>) -> Self {
        Self {
            role_assignments: RoleAssignmentRuleService::new(api.clone(), lookup.clone()),
            rbac: RbacRuleService::new(api, lookup),
        }
    }

    /// Validates every rule concurrently.
    ///
    /// Outcomes come back in spec order: role assignment rules first, then
    /// RBAC rules. One rule's error does not affect the others.
    pub async fn validate(&self, spec: &AzureValidatorSpec) -> Vec<Result<ValidationResult>> {
        let role_assignments = join_all(
            spec.role_assignment_rules
                .iter()
                .map(|rule| self.role_assignments.reconcile(rule)),
        );
        let rbac = join_all(spec.rbac_rules.iter().map(|rule| self.rbac.reconcile(rule)));

        let (mut outcomes, rbac) = futures::join!(role_assignments, rbac);
        outcomes.extend(rbac);
        outcomes
    }
}
