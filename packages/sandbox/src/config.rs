// ABOUTME: Sandbox connection configuration consumed at manager construction
// ABOUTME: Loads template, domain, timeout, and credential settings from the environment

use crate::error::{Result, SandboxError};
use runlet_config::constants;
use runlet_config::env::{env_with_fallback, parse_env_with_fallback};
use serde::{Deserialize, Serialize};

/// Sandbox instances are expired by the remote service after this many
/// seconds of inactivity unless configured otherwise.
pub const DEFAULT_SANDBOX_TIMEOUT_SECS: u64 = 900;

pub const DEFAULT_SANDBOX_DOMAIN: &str = "sandbox.runlet.dev";

/// Immutable connection parameters shared by every handle a manager creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Remote template the sandbox instance is booted from.
    pub template: String,
    /// Network domain of the remote sandbox service.
    pub domain: String,
    /// Inactivity timeout in seconds, enforced entirely by the remote
    /// service. The manager never counts down locally.
    pub timeout_secs: u64,
}

/// Manager construction settings. `api_key` is only required in singleton
/// mode; multi-tenant callers present their own credential on every call.
#[derive(Clone)]
pub struct SandboxConfig {
    pub params: ConnectionParams,
    pub api_key: Option<String>,
}

impl SandboxConfig {
    pub fn new(template: impl Into<String>, domain: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            params: ConnectionParams {
                template: template.into(),
                domain: domain.into(),
                timeout_secs,
            },
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Load the sandbox configuration from `RUNLET_SANDBOX_*` environment
    /// variables. The template has no sensible default and must be set.
    pub fn from_env() -> Result<Self> {
        let template = std::env::var(constants::RUNLET_SANDBOX_TEMPLATE).map_err(|_| {
            SandboxError::Configuration(format!(
                "{} is not set",
                constants::RUNLET_SANDBOX_TEMPLATE
            ))
        })?;

        let domain = env_with_fallback(constants::RUNLET_SANDBOX_DOMAIN, DEFAULT_SANDBOX_DOMAIN);
        let timeout_secs = parse_env_with_fallback(
            constants::RUNLET_SANDBOX_TIMEOUT_SECS,
            DEFAULT_SANDBOX_TIMEOUT_SECS,
        );

        let mut config = Self::new(template, domain, timeout_secs);
        if let Ok(api_key) = std::env::var(constants::RUNLET_SANDBOX_API_KEY) {
            config.api_key = Some(api_key);
        }
        Ok(config)
    }

    /// The singleton-mode credential; absent in multi-tenant deployments.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            SandboxError::Configuration(format!(
                "{} is not set",
                constants::RUNLET_SANDBOX_API_KEY
            ))
        })
    }
}

// Keep the credential out of logs.
impl std::fmt::Debug for SandboxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxConfig")
            .field("params", &self.params)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_params() {
        let config = SandboxConfig::new("data-analysis", "sandbox.example.com", 300)
            .with_api_key("sk-test");
        assert_eq!(config.params.template, "data-analysis");
        assert_eq!(config.params.timeout_secs, 300);
        assert_eq!(config.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let config = SandboxConfig::new("data-analysis", "sandbox.example.com", 300);
        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, SandboxError::Configuration(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config =
            SandboxConfig::new("data-analysis", "sandbox.example.com", 300).with_api_key("sk-test");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("<redacted>"));
    }
}
