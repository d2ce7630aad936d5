//! # RBAC Validation CLI
//!
//! Validates the role assignment rules of a TOML config file against Azure
//! and prints one JSON validation result per rule.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RBAC_VALIDATOR_CONFIG` - Path to the config file
//! - `AZURE_ACCESS_TOKEN` - ARM bearer token
//! - `RUST_LOG` - Log level (default: info)
//!
//! Exit status is 0 when every rule passed, 1 when any rule failed and 2 when
//! any rule could not be validated.

use anyhow::{Context, Result};
use azure_rbac_validator::{
    ArmClient, AzureValidatorSpec, BuiltInRoleLookup, SpecValidator, ValidationState,
    ValidatorConfig,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rbac-validate")]
#[command(about = "Validate Azure role assignments against declared rules")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "RBAC_VALIDATOR_CONFIG")]
    config: PathBuf,

    /// ARM bearer token
    #[arg(long, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    token: String,

    /// Override the ARM management endpoint
    #[arg(long, env = "AZURE_MANAGEMENT_ENDPOINT")]
    management_endpoint: Option<String>,

    /// Pretty-print results
    #[arg(short, long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = ValidatorConfig::load(&cli.config)?;
    if let Some(endpoint) = cli.management_endpoint {
        config.azure.management_endpoint = endpoint;
        config.validate()?;
    }

    info!(
        "Starting RBAC validator v{} with {} rule(s)",
        azure_rbac_validator::VERSION,
        config.spec.result_count()
    );

    let client = ArmClient::new(&config.azure, cli.token).context("Failed to build ARM client")?;
    let lookup = Arc::new(BuiltInRoleLookup::new(client.clone()));
    let validator = SpecValidator::new(Arc::new(client), lookup);

    let mut any_failed = false;
    let mut any_errored = false;
    let rules = rule_labels(&config.spec);
    let outcomes = validator.validate(&config.spec).await;
    for ((kind, principal_id), outcome) in rules.into_iter().zip(outcomes) {
        match outcome {
            Ok(result) => {
                any_failed |= result.state() == ValidationState::Failed;
                let line = if cli.pretty {
                    serde_json::to_string_pretty(&result)?
                } else {
                    serde_json::to_string(&result)?
                };
                println!("{}", line);
            }
            Err(e) => {
                any_errored = true;
                error!(kind, principal_id, "Rule could not be validated: {}", e);
            }
        }
    }

    Ok(if any_errored {
        ExitCode::from(2)
    } else if any_failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

/// `(kind, principal id)` per rule, in the order the validator reports them
fn rule_labels(spec: &AzureValidatorSpec) -> Vec<(&'static str, &str)> {
    spec.role_assignment_rules
        .iter()
        .map(|rule| ("role-assignment", rule.service_principal_id.as_str()))
        .chain(
            spec.rbac_rules
                .iter()
                .map(|rule| ("rbac", rule.security_principal_id.as_str())),
        )
        .collect()
}
