//! Per-invocation job parameters parsed from the host's store properties.

use super::SecretString;
use crate::errors::{AkvError, Result};
use serde::Deserialize;

/// Connection details for one job invocation.
///
/// The host hands these over as a JSON object (the store's custom properties)
/// plus the store path, which is the vault URL. Every credential used by the
/// job comes from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobParameters {
    pub vault_url: String,
    pub tenant_id: String,
    pub client_secret: SecretString,
    pub application_id: String,
    pub subscription_id: String,
    pub vault_name: String,
    pub resource_group_name: String,
    pub api_object_id: String,
}

/// Wire shape of the store properties. Unknown keys (including the host's own
/// `VaultUrl`) are ignored; the store path wins.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StoreProperties {
    tenant_id: String,
    client_secret: SecretString,
    application_id: String,
    subscription_id: String,
    vault_name: String,
    resource_group_name: String,
    #[serde(rename = "APIObjectId")]
    api_object_id: String,
}

impl JobParameters {
    /// Parse the store properties JSON and attach the store path as the vault URL.
    pub fn parse(properties_json: &str, store_path: &str) -> Result<Self> {
        let props: StoreProperties = serde_json::from_str(properties_json).map_err(|e| {
            AkvError::config_with_source("Unable to read the certificate store properties", e)
        })?;

        Ok(Self {
            vault_url: store_path.trim().to_string(),
            tenant_id: props.tenant_id,
            client_secret: props.client_secret,
            application_id: props.application_id,
            subscription_id: props.subscription_id,
            vault_name: props.vault_name,
            resource_group_name: props.resource_group_name,
            api_object_id: props.api_object_id,
        })
    }

    /// Vault URL without a trailing slash, ready for path concatenation.
    pub fn vault_base(&self) -> &str {
        self.vault_url.trim_end_matches('/')
    }

    /// Fail with a config error naming `field` when `value` is blank.
    pub fn require<'a>(value: &'a str, field: &str) -> Result<&'a str> {
        if value.trim().is_empty() {
            return Err(AkvError::config(format!("The store property '{}' is required", field)));
        }
        Ok(value)
    }
}
