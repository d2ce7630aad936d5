//! Validator configuration loading and validation

use crate::types::AzureValidatorSpec;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete validator configuration: ARM settings plus the rules to check
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub azure: AzureSection,

    #[serde(flatten)]
    pub spec: AzureValidatorSpec,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureSection {
    #[serde(default = "default_management_endpoint")]
    pub management_endpoint: String,
    #[serde(default = "default_api_version")]
    pub role_assignments_api_version: String,
    #[serde(default = "default_api_version")]
    pub role_definitions_api_version: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AzureSection {
    fn default() -> Self {
        Self {
            management_endpoint: default_management_endpoint(),
            role_assignments_api_version: default_api_version(),
            role_definitions_api_version: default_api_version(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl AzureSection {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_management_endpoint() -> String {
    "https://management.azure.com".to_string()
}

fn default_api_version() -> String {
    "2022-04-01".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl ValidatorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let endpoint = &self.azure.management_endpoint;
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            bail!("azure.management_endpoint must be an http(s) URL, got {:?}", endpoint);
        }
        if self.azure.request_timeout_secs == 0 {
            bail!("azure.request_timeout_secs must be greater than 0");
        }
        Ok(())
    }
}
