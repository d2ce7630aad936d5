//! Rule and grant types

use serde::{Deserialize, Serialize};

/// Label used when a role reference carries no identifier at all
pub const INVALID_CONFIG_LABEL: &str = "invalid-config";

/// Reference to a role definition
///
/// On the wire a role is `{"name": ..., "roleName": ...}` where `name` is the
/// canonical role definition name (e.g. `b24988ac-6180-42a0-ab88-20f7382dd24c`)
/// and `roleName` is the friendly name (e.g. `Contributor`). `name` wins when
/// both are present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RoleSpec", into = "RoleSpec")]
pub enum RoleReference {
    /// Canonical role definition name, used as-is
    CanonicalId(String),
    /// Friendly role name, resolved through a lookup table
    FriendlyName(String),
    /// Neither field set; a configuration error
    Unspecified,
}

impl RoleReference {
    /// Reference a role by its canonical id
    pub fn canonical(id: impl Into<String>) -> Self {
        Self::CanonicalId(id.into())
    }

    /// Reference a role by its friendly name
    pub fn friendly(name: impl Into<String>) -> Self {
        Self::FriendlyName(name.into())
    }

    /// Best-effort human label: friendly name, else canonical id, else a placeholder
    pub fn label(&self) -> &str {
        match self {
            Self::FriendlyName(name) => name,
            Self::CanonicalId(id) => id,
            Self::Unspecified => INVALID_CONFIG_LABEL,
        }
    }
}

/// Wire shape of a role reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    /// Canonical role definition name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Friendly role name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
}

impl From<RoleSpec> for RoleReference {
    fn from(spec: RoleSpec) -> Self {
        match (spec.name, spec.role_name) {
            (Some(name), _) => Self::CanonicalId(name),
            (None, Some(role_name)) => Self::FriendlyName(role_name),
            (None, None) => Self::Unspecified,
        }
    }
}

impl From<RoleReference> for RoleSpec {
    fn from(reference: RoleReference) -> Self {
        match reference {
            RoleReference::CanonicalId(name) => Self {
                name: Some(name),
                role_name: None,
            },
            RoleReference::FriendlyName(role_name) => Self {
                name: None,
                role_name: Some(role_name),
            },
            RoleReference::Unspecified => Self::default(),
        }
    }
}

/// Validates that one or more roles are assigned to a service principal
/// anywhere within a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentRule {
    /// Roles the principal must hold
    pub roles: Vec<RoleReference>,

    /// Object id of the service principal
    pub service_principal_id: String,

    /// Subscription to search for role assignments
    pub subscription_id: String,
}

/// Validates that a security principal holds one role per scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RbacRule {
    /// Object id of the security principal
    pub security_principal_id: String,

    /// Permission sets, each checked against its own scope
    pub permissions: Vec<PermissionSet>,
}

/// One (scope, role) requirement of an [`RbacRule`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    /// ARM scope the role must apply to
    pub scope: String,

    /// Role the principal must hold at the scope
    pub role: RoleReference,
}

/// Role assignment as returned by the authorization backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Fully qualified role assignment id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<GrantProperties>,
}

/// Properties of a role assignment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantProperties {
    /// e.g. `/subscriptions/<sub>/providers/Microsoft.Authorization/roleDefinitions/<name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_definition_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Grant {
    /// Create a grant carrying only a role definition reference
    pub fn new(role_definition_id: impl Into<String>) -> Self {
        Self {
            id: None,
            properties: Some(GrantProperties {
                role_definition_id: Some(role_definition_id.into()),
                ..Default::default()
            }),
        }
    }

    /// Returns the role definition reference, if the backend supplied one
    pub fn role_definition_id(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.role_definition_id.as_deref())
    }
}

/// The rules of one validator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureValidatorSpec {
    #[serde(default)]
    pub role_assignment_rules: Vec<RoleAssignmentRule>,

    #[serde(default)]
    pub rbac_rules: Vec<RbacRule>,
}

impl AzureValidatorSpec {
    /// Number of validation results reconciling this spec produces
    pub fn result_count(&self) -> usize {
        self.role_assignment_rules.len() + self.rbac_rules.len()
    }
}
