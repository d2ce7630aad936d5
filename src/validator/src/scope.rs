//! Azure Resource Manager scope parsing
//!
//! A scope is a slash-separated path identifying the resource boundary a role
//! assignment applies to:
//! - `/subscriptions/<sub>`
//! - `/subscriptions/<sub>/resourceGroups/<rg>`
//! - `/subscriptions/<sub>/resourceGroups/<rg>/providers/Microsoft.Storage/storageAccounts/<name>`
//!
//! # Examples
//!
//! ```
//! use azure_rbac_validator::scope::ArmScope;
//!
//! let scope = ArmScope::new("/subscriptions/00000000-0000-0000-0000-000000000001/resourceGroups/rg1").unwrap();
//! assert_eq!(scope.subscription_id().unwrap(), "00000000-0000-0000-0000-000000000001");
//! ```

use std::fmt;
use std::str::FromStr;

const SUBSCRIPTIONS_SEGMENT: &str = "subscriptions";

/// Result type for scope operations
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Errors that can occur while parsing a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// Empty scope string provided
    EmptyScope,
    /// Scope is not an absolute path
    NotAbsolute(String),
    /// Scope segment is empty
    EmptySegment(String),
    /// Scope has no subscription segment
    NoSubscription(String),
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyScope => write!(f, "Scope cannot be empty"),
            Self::NotAbsolute(s) => write!(f, "Scope must start with '/': {:?}", s),
            Self::EmptySegment(s) => write!(f, "Scope segment cannot be empty: {:?}", s),
            Self::NoSubscription(s) => {
                write!(f, "Failed to parse subscription ID from scope {:?}", s)
            }
        }
    }
}

impl std::error::Error for ScopeError {}

/// A parsed ARM scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArmScope {
    /// Original scope string
    raw: String,
    /// Parsed segments
    segments: Vec<String>,
}

impl ArmScope {
    /// Parses a scope string. A single trailing slash is tolerated.
    pub fn new(s: &str) -> ScopeResult<Self> {
        if s.is_empty() {
            return Err(ScopeError::EmptyScope);
        }

        let Some(path) = s.strip_prefix('/') else {
            return Err(ScopeError::NotAbsolute(s.to_string()));
        };
        let path = path.strip_suffix('/').unwrap_or(path);
        if path.is_empty() {
            return Err(ScopeError::EmptySegment(s.to_string()));
        }

        let segments: Vec<String> = path.split('/').map(|seg| seg.to_string()).collect();
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(ScopeError::EmptySegment(s.to_string()));
        }

        Ok(Self {
            raw: s.to_string(),
            segments,
        })
    }

    /// Returns the segments of this scope
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the raw scope string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the subscription the scope is contained within.
    ///
    /// ARM treats path keywords case-insensitively, so `/Subscriptions/<id>`
    /// is accepted as well.
    pub fn subscription_id(&self) -> ScopeResult<&str> {
        self.segments
            .windows(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(SUBSCRIPTIONS_SEGMENT))
            .map(|pair| pair[1].as_str())
            .ok_or_else(|| ScopeError::NoSubscription(self.raw.clone()))
    }
}

impl FromStr for ArmScope {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ArmScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Parses the subscription id out of a role assignment scope string
pub fn subscription_from_scope(scope: &str) -> ScopeResult<String> {
    let scope = ArmScope::new(scope)?;
    scope.subscription_id().map(str::to_string)
}
