//! OAuth2 client-credential token acquisition against the Azure AD v1 endpoint.

use crate::config::SecretString;
use crate::errors::{AkvError, Result};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::fmt;
use tracing::{debug, error};

/// Resource a bearer token is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    /// Azure Resource Manager, used for vault create and discovery
    Management,
    /// Key Vault data plane, used for certificate operations
    KeyVault,
}

impl Audience {
    pub fn resource(&self) -> &'static str {
        match self {
            Audience::Management => "https://management.azure.com/",
            Audience::KeyVault => "https://vault.azure.net",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// Access token for one audience. Never cached past the call that requested it.
#[derive(Debug, Clone)]
pub struct BearerToken {
    value: SecretString,
    pub expires_in: Option<u64>,
    pub audience: Audience,
}

impl BearerToken {
    pub fn new(value: impl Into<String>, expires_in: Option<u64>, audience: Audience) -> Self {
        Self { value: SecretString::new(value), expires_in, audience }
    }

    /// Raw token for the `Authorization` header.
    pub fn secret(&self) -> &str {
        self.value.expose_secret()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,

    // The v1 endpoint reports this as a string.
    #[serde(default, deserialize_with = "number_or_string")]
    expires_in: Option<u64>,
}

fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Requests tokens with the client-credential grant.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    http: Client,
    login_base: String,
}

impl TokenProvider {
    pub fn new(http: Client, login_base: impl Into<String>) -> Self {
        let login_base = login_base.into().trim_end_matches('/').to_string();
        Self { http, login_base }
    }

    fn token_url(&self, tenant_id: &str) -> String {
        format!("{}/{}/oauth2/token", self.login_base, tenant_id)
    }

    /// Exchange the service principal's credentials for a token scoped to `audience`.
    pub async fn acquire_token(
        &self,
        tenant_id: &str,
        client_id: &str,
        client_secret: &SecretString,
        audience: Audience,
    ) -> Result<BearerToken> {
        let url = self.token_url(tenant_id);
        debug!(url = %url, audience = %audience, client_id = %client_id, "Requesting access token");

        let form = [
            ("resource", audience.resource()),
            ("client_id", client_id),
            ("grant_type", "client_credentials"),
            ("client_secret", client_secret.expose_secret()),
        ];

        let response = self.http.post(&url).form(&form).send().await.map_err(|e| {
            AkvError::auth_with_source(format!("Token request to {} failed", url), e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "<unable to read error>".to_string());
            error!(status = %status, body = %body, audience = %audience, "Token request rejected");
            return Err(AkvError::auth(format!(
                "Token request for {} failed with status {}",
                audience,
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AkvError::auth_with_source("Failed to read token response", e))?;

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AkvError::auth_with_source("Token response is not valid", e))?;

        debug!(audience = %audience, expires_in = ?token.expires_in, "Access token acquired");
        Ok(BearerToken::new(token.access_token, token.expires_in, audience))
    }
}
