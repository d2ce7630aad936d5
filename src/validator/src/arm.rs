//! Azure Resource Manager client
//!
//! Implements [`RoleAssignmentApi`] and a built-in role catalog
//! [`RoleLookupProvider`] over the ARM REST API. Every list call follows
//! `nextLink` until the result set is exhausted. The bearer token is supplied
//! by the caller; acquiring it is not this module's concern.

use crate::api::{PrincipalFilter, RoleAssignmentApi};
use crate::config::AzureSection;
use crate::error::{Result, ValidatorError};
use crate::role::{RoleLookupProvider, RoleLookupTable};
use crate::scope::ArmScope;
use crate::types::Grant;
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;

const ROLE_ASSIGNMENTS_PATH: &str = "providers/Microsoft.Authorization/roleAssignments";
const ROLE_DEFINITIONS_PATH: &str = "providers/Microsoft.Authorization/roleDefinitions";
const BUILT_IN_ROLE_FILTER: &str = "type eq 'BuiltInRole'";

/// Upper bound on pages followed for a single list call
pub const MAX_PAGES: usize = 1_000;

/// One page of an ARM list response. `value` is required so that a body that
/// is not a list fails to decode instead of reading as an empty page.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub value: Vec<T>,

    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

/// Fetches `first_url` and every page it links to, concatenating the values
pub async fn drain_pages<T, F, Fut>(first_url: Url, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut pages = 0usize;
    let mut visited = HashSet::new();
    let mut next = Some(first_url);

    while let Some(url) = next.take() {
        if pages >= MAX_PAGES {
            return Err(ValidatorError::Backend(format!(
                "result set exceeds {} pages",
                MAX_PAGES
            )));
        }
        visited.insert(url.to_string());

        let page = fetch(url).await?;
        pages += 1;
        items.extend(page.value);

        if let Some(link) = page.next_link.filter(|link| !link.is_empty()) {
            let url = Url::parse(&link).map_err(|e| {
                ValidatorError::Backend(format!("invalid nextLink {:?}: {}", link, e))
            })?;
            if visited.contains(url.as_str()) {
                return Err(ValidatorError::Backend(format!(
                    "nextLink {} repeats an already fetched page",
                    url
                )));
            }
            next = Some(url);
        }
    }

    debug!(pages, items = items.len(), "Drained ARM result pages");
    Ok(items)
}

/// Extracts a readable message from an ARM error body
fn parse_arm_error(body: &Value) -> String {
    let error = &body["error"];
    match (error["code"].as_str(), error["message"].as_str()) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (None, Some(message)) => message.to_string(),
        (Some(code), None) => code.to_string(),
        (None, None) => body.to_string(),
    }
}

/// Role definition as listed by ARM
#[derive(Debug, Deserialize)]
struct RoleDefinition {
    /// Canonical role definition name (a GUID)
    name: String,
    #[serde(default)]
    properties: Option<RoleDefinitionProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleDefinitionProperties {
    #[serde(default)]
    role_name: Option<String>,
}

/// Maps each definition's friendly role name to its canonical name
fn lookup_table(definitions: Vec<RoleDefinition>) -> RoleLookupTable {
    definitions
        .into_iter()
        .filter_map(|definition| {
            let role_name = definition.properties?.role_name?;
            Some((role_name, definition.name))
        })
        .collect()
}

/// ARM REST client authenticated with a caller-supplied bearer token
#[derive(Clone)]
pub struct ArmClient {
    client: reqwest::Client,
    token: String,
    management_endpoint: String,
    role_assignments_api_version: String,
    role_definitions_api_version: String,
}

impl ArmClient {
    pub fn new(config: &AzureSection, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            token: token.into(),
            management_endpoint: config.management_endpoint.trim_end_matches('/').to_string(),
            role_assignments_api_version: config.role_assignments_api_version.clone(),
            role_definitions_api_version: config.role_definitions_api_version.clone(),
        })
    }

    /// `<endpoint><scope>/<path>?<params>`. Scope segments are
    /// percent-encoded, so reserved characters cannot escape the path.
    fn url(&self, scope: &str, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let scope = ArmScope::new(scope)?;
        let mut url = Url::parse(&self.management_endpoint).map_err(|e| {
            ValidatorError::Backend(format!(
                "invalid management endpoint {:?}: {}",
                self.management_endpoint, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ValidatorError::Backend(format!(
                    "management endpoint {:?} cannot carry a path",
                    self.management_endpoint
                ))
            })?
            .pop_if_empty()
            .extend(scope.segments())
            .extend(path.split('/'));
        url.query_pairs_mut().extend_pairs(params);

        Ok(url)
    }

    fn role_assignments_url(&self, scope: &str, filter: &PrincipalFilter) -> Result<Url> {
        let filter = filter.to_string();
        self.url(
            scope,
            ROLE_ASSIGNMENTS_PATH,
            &[
                ("api-version", self.role_assignments_api_version.as_str()),
                ("$filter", filter.as_str()),
            ],
        )
    }

    fn role_definitions_url(&self, subscription_id: &str) -> Result<Url> {
        self.url(
            &format!("/subscriptions/{}", subscription_id),
            ROLE_DEFINITIONS_PATH,
            &[
                ("api-version", self.role_definitions_api_version.as_str()),
                ("$filter", BUILT_IN_ROLE_FILTER),
            ],
        )
    }

    async fn get_page<T: DeserializeOwned>(&self, url: Url) -> Result<Page<T>> {
        debug!(url = %url, "Azure ARM GET");
        let resp = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(ValidatorError::Backend(format!(
                "GET {}: status {}: {}",
                url,
                status.as_u16(),
                parse_arm_error(&body)
            )));
        }

        Ok(serde_json::from_value(body)?)
    }

    async fn list_grants(&self, scope: &str, filter: &PrincipalFilter) -> Result<Vec<Grant>> {
        let url = self.role_assignments_url(scope, filter)?;
        drain_pages(url, |url| self.get_page(url))
            .await
            .map_err(|e| match e {
                ValidatorError::Backend(msg) => ValidatorError::Backend(format!(
                    "failed to retrieve next page of role assignment results: {}",
                    msg
                )),
                other => other,
            })
    }
}

#[async_trait]
impl RoleAssignmentApi for ArmClient {
    async fn list_for_subscription(
        &self,
        subscription_id: &str,
        filter: &PrincipalFilter,
    ) -> Result<Vec<Grant>> {
        self.list_grants(&format!("/subscriptions/{}", subscription_id), filter)
            .await
    }

    async fn list_for_scope(&self, scope: &str, filter: &PrincipalFilter) -> Result<Vec<Grant>> {
        self.list_grants(scope, filter).await
    }
}

/// Looks friendly role names up in a subscription's built-in role catalog
#[derive(Clone)]
pub struct BuiltInRoleLookup {
    client: ArmClient,
}

impl BuiltInRoleLookup {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoleLookupProvider for BuiltInRoleLookup {
    async fn provide(&self, subscription_id: &str) -> Result<RoleLookupTable> {
        let url = self.client.role_definitions_url(subscription_id)?;
        let definitions = drain_pages(url, |url| self.client.get_page(url))
            .await
            .map_err(|e| ValidatorError::Lookup(e.to_string()))?;

        let table = lookup_table(definitions);
        debug!(subscription_id, roles = table.len(), "Loaded built-in role catalog");
        Ok(table)
    }
}
