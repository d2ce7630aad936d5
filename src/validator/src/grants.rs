//! Grant set construction

use crate::error::{Result, ValidatorError};
use crate::role::role_name_from_definition_id;
use crate::types::Grant;
use std::collections::HashSet;

/// Builds the set of canonical role names held through `grants`.
///
/// A grant without a role definition reference fails the whole set.
pub fn grant_set(grants: &[Grant]) -> Result<HashSet<String>> {
    grants
        .iter()
        .map(|grant| {
            grant
                .role_definition_id()
                .map(|id| role_name_from_definition_id(id).to_string())
                .ok_or_else(|| {
                    ValidatorError::MalformedGrant(format!(
                        "missing properties.roleDefinitionId on role assignment {}",
                        grant.id.as_deref().unwrap_or("<unknown>")
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str) -> String {
        format!("/subscriptions/s/providers/Microsoft.Authorization/roleDefinitions/{}", name)
    }

    #[test]
    fn test_grant_set_dedupes() {
        let grants = vec![
            Grant::new(definition("a")),
            Grant::new(definition("b")),
            Grant::new(definition("a")),
        ];
        let set = grant_set(&grants).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
        assert!(set.contains("b"));
    }

    #[test]
    fn test_empty_grants() {
        assert!(grant_set(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_grant_fails() {
        let grants = vec![Grant::new(definition("a")), Grant::default()];
        let err = grant_set(&grants).unwrap_err();
        assert!(matches!(err, ValidatorError::MalformedGrant(_)));
    }
}
