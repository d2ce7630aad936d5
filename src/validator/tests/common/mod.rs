//! Shared fixtures for validator integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use azure_rbac_validator::{
    Grant, PrincipalFilter, Result, RoleAssignmentApi, RoleLookupProvider, RoleLookupTable,
    ValidatorError,
};
use std::collections::HashMap;
use std::sync::Mutex;

pub const PRINCIPAL: &str = "6f0e2c5a-1b2c-4d3e-8f90-0123456789ab";
pub const SUB_1: &str = "00000000-0000-0000-0000-000000000001";
pub const SUB_2: &str = "00000000-0000-0000-0000-000000000002";

pub fn definition(subscription_id: &str, name: &str) -> Grant {
    Grant::new(format!(
        "/subscriptions/{}/providers/Microsoft.Authorization/roleDefinitions/{}",
        subscription_id, name
    ))
}

pub fn resource_group(subscription_id: &str, name: &str) -> String {
    format!("/subscriptions/{}/resourceGroups/{}", subscription_id, name)
}

/// Role assignment API serving fixed grants per subscription or scope
#[derive(Default)]
pub struct FakeRoleAssignmentApi {
    pub by_subscription: HashMap<String, Vec<Grant>>,
    pub by_scope: HashMap<String, Vec<Grant>>,
    pub failing_scopes: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeRoleAssignmentApi {
    pub fn with_subscription(mut self, subscription_id: &str, grants: Vec<Grant>) -> Self {
        self.by_subscription.insert(subscription_id.to_string(), grants);
        self
    }

    pub fn with_scope(mut self, scope: &str, grants: Vec<Grant>) -> Self {
        self.by_scope.insert(scope.to_string(), grants);
        self
    }

    pub fn failing_at(mut self, scope: &str) -> Self {
        self.failing_scopes.push(scope.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoleAssignmentApi for FakeRoleAssignmentApi {
    async fn list_for_subscription(
        &self,
        subscription_id: &str,
        filter: &PrincipalFilter,
    ) -> Result<Vec<Grant>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("subscription:{}:{}", subscription_id, filter));
        if self.failing_scopes.iter().any(|s| s == subscription_id) {
            return Err(ValidatorError::Backend("page retrieval failed".to_string()));
        }
        Ok(self.by_subscription.get(subscription_id).cloned().unwrap_or_default())
    }

    async fn list_for_scope(&self, scope: &str, filter: &PrincipalFilter) -> Result<Vec<Grant>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("scope:{}:{}", scope, filter));
        if self.failing_scopes.iter().any(|s| s == scope) {
            return Err(ValidatorError::Backend("page retrieval failed".to_string()));
        }
        Ok(self.by_scope.get(scope).cloned().unwrap_or_default())
    }
}

/// Lookup provider with one table per subscription, recording requests
#[derive(Default)]
pub struct PerSubscriptionLookup {
    pub tables: HashMap<String, RoleLookupTable>,
    pub requests: Mutex<Vec<String>>,
}

impl PerSubscriptionLookup {
    pub fn with_table(mut self, subscription_id: &str, entries: &[(&str, &str)]) -> Self {
        self.tables.insert(
            subscription_id.to_string(),
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoleLookupProvider for PerSubscriptionLookup {
    async fn provide(&self, subscription_id: &str) -> Result<RoleLookupTable> {
        self.requests.lock().unwrap().push(subscription_id.to_string());
        self.tables
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| ValidatorError::Lookup(format!("no catalog for {}", subscription_id)))
    }
}
