//! # Azure RBAC Validator
//!
//! Point-in-time compliance checks of Azure role assignments. Given a rule
//! naming a security principal and the roles it should hold, the validators
//! fetch the principal's current role assignments and report which roles are
//! missing. Nothing is ever created or removed.
//!
//! ## Features
//!
//! - **Role references** by canonical role definition name or friendly name
//! - **Injected backends**: role assignment API and role lookup table are traits
//! - **Full accumulation**: every missing role is reported, in rule order
//! - **Hard errors kept apart**: backend and configuration problems are `Err`,
//!   missing roles are a `Failed` [`ValidationResult`]
//!
//! ## Example
//!
//! ```rust
//! use azure_rbac_validator::{
//!     Grant, PrincipalFilter, RoleAssignmentApi, RoleAssignmentRule, RoleAssignmentRuleService,
//!     RoleReference, StaticRoleLookup, ValidationState,
//! };
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Fixed(Vec<Grant>);
//!
//! #[async_trait]
//! impl RoleAssignmentApi for Fixed {
//!     async fn list_for_subscription(&self, _: &str, _: &PrincipalFilter) -> azure_rbac_validator::Result<Vec<Grant>> {
//!         Ok(self.0.clone())
//!     }
//!     async fn list_for_scope(&self, _: &str, _: &PrincipalFilter) -> azure_rbac_validator::Result<Vec<Grant>> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(Fixed(vec![Grant::new(
//!         "/subscriptions/s/providers/Microsoft.Authorization/roleDefinitions/role-def-123",
//!     )]));
//!     let lookup = Arc::new(StaticRoleLookup::new([("Contributor", "role-def-123")]));
//!     let service = RoleAssignmentRuleService::new(api, lookup);
//!
//!     let rule = RoleAssignmentRule {
//!         roles: vec![RoleReference::friendly("Contributor")],
//!         service_principal_id: "6f0e2c5a-1b2c-4d3e-8f90-0123456789ab".to_string(),
//!         subscription_id: "s".to_string(),
//!     };
//!
//!     let result = service.reconcile(&rule).await?;
//!     assert_eq!(result.state(), ValidationState::Succeeded);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod arm;
pub mod check;
pub mod config;
pub mod error;
pub mod grants;
pub mod result;
pub mod role;
pub mod scope;
pub mod types;
pub mod validators;

// Re-export commonly used types
pub use api::{PrincipalFilter, RoleAssignmentApi};
pub use arm::{ArmClient, BuiltInRoleLookup};
pub use config::ValidatorConfig;
pub use error::{Result, ValidatorError};
pub use result::{ValidationResult, ValidationState};
pub use role::{resolve_role, RoleLookupProvider, RoleLookupTable, StaticRoleLookup};
pub use scope::{ArmScope, ScopeError};
pub use types::{
    AzureValidatorSpec, Grant, PermissionSet, RbacRule, RoleAssignmentRule, RoleReference,
};
pub use validators::{RbacRuleService, RoleAssignmentRuleService, SpecValidator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
