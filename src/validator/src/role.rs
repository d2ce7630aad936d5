//! Role identifier resolution
//!
//! Turns a [`RoleReference`] into the canonical role definition name used by
//! Azure, consulting an injected [`RoleLookupProvider`] only when the
//! reference carries a friendly name.
//!
//! # Example
//!
//! ```rust
//! use azure_rbac_validator::role::{resolve_role, StaticRoleLookup};
//! use azure_rbac_validator::RoleReference;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let lookup = StaticRoleLookup::new([("Contributor", "role-def-123")]);
//! let id = resolve_role(&RoleReference::friendly("Contributor"), "sub-1", &lookup).await?;
//! assert_eq!(id, "role-def-123");
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, ValidatorError};
use crate::types::RoleReference;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Friendly role name → canonical role definition name
pub type RoleLookupTable = HashMap<String, String>;

/// Supplies the role lookup table of a subscription
#[async_trait]
pub trait RoleLookupProvider: Send + Sync {
    /// Returns the lookup table for `subscription_id`
    async fn provide(&self, subscription_id: &str) -> Result<RoleLookupTable>;
}

/// Lookup provider backed by a fixed table, identical for every subscription
#[derive(Debug, Clone, Default)]
pub struct StaticRoleLookup {
    table: RoleLookupTable,
}

impl StaticRoleLookup {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl RoleLookupProvider for StaticRoleLookup {
    async fn provide(&self, _subscription_id: &str) -> Result<RoleLookupTable> {
        Ok(self.table.clone())
    }
}

/// Resolves a role reference to its canonical role definition name.
///
/// A canonical id is returned unchanged without verification. A friendly name
/// is looked up in the table for `subscription_id`.
pub async fn resolve_role(
    reference: &RoleReference,
    subscription_id: &str,
    lookup: &dyn RoleLookupProvider,
) -> Result<String> {
    match reference {
        RoleReference::CanonicalId(id) => Ok(id.clone()),
        RoleReference::FriendlyName(name) => {
            let table = lookup.provide(subscription_id).await?;
            let id = table
                .get(name)
                .cloned()
                .ok_or_else(|| ValidatorError::UnknownRoleName(name.clone()))?;
            debug!(role_name = %name, role = %id, subscription_id, "Resolved role name");
            Ok(id)
        }
        RoleReference::Unspecified => Err(ValidatorError::MissingRoleIdentifier),
    }
}

/// Extracts the canonical role name from a role definition id.
///
/// `/subscriptions/<sub>/providers/Microsoft.Authorization/roleDefinitions/<name>` → `<name>`
pub fn role_name_from_definition_id(role_definition_id: &str) -> &str {
    let trimmed = role_definition_id.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls so tests can assert no lookup happened
    #[derive(Default)]
    struct CountingLookup {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RoleLookupProvider for CountingLookup {
        async fn provide(&self, _subscription_id: &str) -> Result<RoleLookupTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RoleLookupTable::new())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl RoleLookupProvider for FailingLookup {
        async fn provide(&self, subscription_id: &str) -> Result<RoleLookupTable> {
            Err(ValidatorError::Lookup(format!("catalog unavailable for {}", subscription_id)))
        }
    }

    #[tokio::test]
    async fn test_resolve_friendly_name() {
        let lookup = StaticRoleLookup::new([("Contributor", "role-def-123")]);
        let id = resolve_role(&RoleReference::friendly("Contributor"), "sub", &lookup)
            .await
            .unwrap();
        assert_eq!(id, "role-def-123");
    }

    #[tokio::test]
    async fn test_resolve_unknown_friendly_name() {
        let lookup = StaticRoleLookup::new([("Contributor", "role-def-123")]);
        let err = resolve_role(&RoleReference::friendly("NoSuchRole"), "sub", &lookup)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::UnknownRoleName(name) if name == "NoSuchRole"));
    }

    #[tokio::test]
    async fn test_friendly_name_is_case_sensitive() {
        let lookup = StaticRoleLookup::new([("Contributor", "role-def-123")]);
        let err = resolve_role(&RoleReference::friendly("contributor"), "sub", &lookup)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::UnknownRoleName(_)));
    }

    #[tokio::test]
    async fn test_canonical_id_skips_lookup() {
        let lookup = CountingLookup::default();
        let id = resolve_role(&RoleReference::canonical("anything-goes"), "sub", &lookup)
            .await
            .unwrap();
        assert_eq!(id, "anything-goes");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unspecified_skips_lookup() {
        let lookup = CountingLookup::default();
        let err = resolve_role(&RoleReference::Unspecified, "sub", &lookup)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::MissingRoleIdentifier));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_error_propagates() {
        let err = resolve_role(&RoleReference::friendly("Reader"), "sub", &FailingLookup)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::Lookup(_)));
    }

    #[test]
    fn test_role_name_from_definition_id() {
        assert_eq!(
            role_name_from_definition_id(
                "/subscriptions/s/providers/Microsoft.Authorization/roleDefinitions/b24988ac-6180-42a0-ab88-20f7382dd24c"
            ),
            "b24988ac-6180-42a0-ab88-20f7382dd24c"
        );
        assert_eq!(
            role_name_from_definition_id("/providers/Microsoft.Authorization/roleDefinitions/rd1/"),
            "rd1"
        );
        assert_eq!(role_name_from_definition_id("rd1"), "rd1");
    }
}
