//! # Configuration Settings
//!
//! Process-wide settings for the Azure endpoints and for logging. These are
//! independent of any single job; per-job credentials live in
//! [`JobParameters`](super::JobParameters).

use crate::errors::{AkvError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_LOGIN_ENDPOINT: &str = "https://login.windows.net";
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_KEYVAULT_API_VERSION: &str = "7.4";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Azure endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AzureSettings {
    /// Authority host for the OAuth2 token endpoint
    #[validate(url(message = "Login endpoint must be a valid URL"))]
    pub login_endpoint: String,

    /// Azure Resource Manager base URL
    #[validate(url(message = "Management endpoint must be a valid URL"))]
    pub management_endpoint: String,

    /// Key Vault data-plane api-version query parameter
    #[validate(length(min = 1, message = "Key Vault API version cannot be empty"))]
    pub keyvault_api_version: String,

    /// Per-request HTTP timeout in seconds
    #[validate(range(
        min = 1,
        max = 600,
        message = "HTTP timeout must be between 1 and 600 seconds"
    ))]
    pub http_timeout_seconds: u64,
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            login_endpoint: DEFAULT_LOGIN_ENDPOINT.to_string(),
            management_endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            keyvault_api_version: DEFAULT_KEYVAULT_API_VERSION.to_string(),
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl AzureSettings {
    /// Load from `AKV_*` environment variables, falling back to defaults.
    ///
    /// - `AKV_LOGIN_ENDPOINT`
    /// - `AKV_MANAGEMENT_ENDPOINT`
    /// - `AKV_KEYVAULT_API_VERSION`
    /// - `AKV_HTTP_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let http_timeout_seconds = match std::env::var("AKV_HTTP_TIMEOUT_SECS") {
            Ok(value) => value.trim().parse().map_err(|e| {
                AkvError::config_with_source(format!("Invalid AKV_HTTP_TIMEOUT_SECS '{}'", value), e)
            })?,
            Err(_) => defaults.http_timeout_seconds,
        };

        let settings = Self {
            login_endpoint: env_or("AKV_LOGIN_ENDPOINT", defaults.login_endpoint),
            management_endpoint: env_or("AKV_MANAGEMENT_ENDPOINT", defaults.management_endpoint),
            keyvault_api_version: env_or("AKV_KEYVAULT_API_VERSION", defaults.keyvault_api_version),
            http_timeout_seconds,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Login endpoint without a trailing slash
    pub fn login_base(&self) -> &str {
        self.login_endpoint.trim_end_matches('/')
    }

    /// Management endpoint without a trailing slash
    pub fn management_base(&self) -> &str {
        self.management_endpoint.trim_end_matches('/')
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}

impl ObservabilityConfig {
    /// Load from `AKV_LOG_LEVEL` and `AKV_JSON_LOGS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let json_logging = std::env::var("AKV_JSON_LOGS")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
            .unwrap_or(defaults.json_logging);
        Self { log_level: env_or("AKV_LOG_LEVEL", defaults.log_level), json_logging }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).unwrap_or(default)
}
