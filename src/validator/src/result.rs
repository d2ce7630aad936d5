//! Validation results

use serde::{Deserialize, Serialize};

/// Prefix of every validation rule identifier
pub const VALIDATION_RULE_PREFIX: &str = "validation";

/// Validation type of single-subscription role assignment rules
pub const VALIDATION_TYPE_ROLE_ASSIGNMENT: &str = "azure-role-assignment";

/// Validation type of multi-scope RBAC rules
pub const VALIDATION_TYPE_RBAC: &str = "azure-rbac";

pub const MESSAGE_ALL_ROLES_FOUND: &str = "Security principal has all required roles.";
pub const MESSAGE_MISSING_ROLES: &str = "Security principal missing one or more required roles.";

/// Terminal state of a validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationState {
    Succeeded,
    Failed,
}

/// Outcome of validating one rule
///
/// Starts out as [`ValidationState::Succeeded`] and can move to
/// [`ValidationState::Failed`] once, through [`ValidationResult::conclude`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    state: ValidationState,
    validation_type: String,
    validation_rule: String,
    message: String,
    failures: Vec<String>,
    status: bool,
}

impl ValidationResult {
    /// Optimistic result for the rule identified by `identifier`
    pub fn succeeded(validation_type: impl Into<String>, identifier: &str) -> Self {
        Self {
            state: ValidationState::Succeeded,
            validation_type: validation_type.into(),
            validation_rule: rule_identifier(identifier),
            message: MESSAGE_ALL_ROLES_FOUND.to_string(),
            failures: Vec::new(),
            status: true,
        }
    }

    /// Applies accumulated failures. No failures leaves the result untouched.
    pub fn conclude(mut self, failures: Vec<String>) -> Self {
        if !failures.is_empty() && self.state == ValidationState::Succeeded {
            self.fail(MESSAGE_MISSING_ROLES, failures);
        }
        self
    }

    fn fail(&mut self, message: &str, failures: Vec<String>) {
        self.state = ValidationState::Failed;
        self.message = message.to_string();
        self.failures = failures;
        self.status = false;
    }

    pub fn state(&self) -> ValidationState {
        self.state
    }

    pub fn validation_type(&self) -> &str {
        &self.validation_type
    }

    /// Rule identifier, e.g. `validation-<principal id>`
    pub fn validation_rule(&self) -> &str {
        &self.validation_rule
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Missing roles in the order they were found
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Whether the validation condition holds
    pub fn condition_is_true(&self) -> bool {
        self.status
    }
}

/// Formats a rule identifier
pub fn rule_identifier(identifier: &str) -> String {
    format!("{}-{}", VALIDATION_RULE_PREFIX, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succeeded_shape() {
        let result = ValidationResult::succeeded(VALIDATION_TYPE_RBAC, "p1");
        assert_eq!(result.state(), ValidationState::Succeeded);
        assert_eq!(result.validation_type(), VALIDATION_TYPE_RBAC);
        assert_eq!(result.validation_rule(), "validation-p1");
        assert_eq!(result.message(), MESSAGE_ALL_ROLES_FOUND);
        assert!(result.failures().is_empty());
        assert!(result.condition_is_true());
    }

    #[test]
    fn test_conclude_without_failures() {
        let result = ValidationResult::succeeded(VALIDATION_TYPE_RBAC, "p1");
        let concluded = result.clone().conclude(Vec::new());
        assert_eq!(concluded, result);
    }

    #[test]
    fn test_conclude_with_failures() {
        let result = ValidationResult::succeeded(VALIDATION_TYPE_ROLE_ASSIGNMENT, "p1")
            .conclude(vec!["missing role a".to_string(), "missing role b".to_string()]);

        assert_eq!(result.state(), ValidationState::Failed);
        assert_eq!(result.message(), MESSAGE_MISSING_ROLES);
        assert_eq!(result.failures(), ["missing role a", "missing role b"]);
        assert!(!result.condition_is_true());
        assert_eq!(result.validation_rule(), "validation-p1");
    }

    #[test]
    fn test_failed_is_terminal() {
        let result = ValidationResult::succeeded(VALIDATION_TYPE_RBAC, "p1")
            .conclude(vec!["missing role a".to_string()])
            .conclude(vec!["missing role b".to_string()]);
        assert_eq!(result.failures(), ["missing role a"]);

        let result = result.conclude(Vec::new());
        assert_eq!(result.state(), ValidationState::Failed);
    }

    #[test]
    fn test_serialized_shape() {
        let result = ValidationResult::succeeded(VALIDATION_TYPE_RBAC, "p1")
            .conclude(vec!["missing role a".to_string()]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["state"], "Failed");
        assert_eq!(json["validationRule"], "validation-p1");
        assert_eq!(json["status"], false);
        assert_eq!(json["failures"][0], "missing role a");
    }
}
