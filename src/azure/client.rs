//! reqwest-backed [`KeyVaultApi`] implementation.
//!
//! Resource Manager calls (vault create, discovery) use a management-audience
//! token; certificate calls go straight to the vault URL with a Key Vault
//! token. A fresh token is requested for every API call.

use super::api::{ClientFactory, KeyVaultApi};
use super::models::{
    AccessPolicy, CertificateBundle, CertificateItem, CertificateOperation,
    CertificateOperationBundle, CertificateRecord, CertificateSummary, CreateVaultRequest,
    DeletedCertificate, DeletedCertificateBundle, ImportCertificateRequest, Page, Permissions,
    Sku, VaultDescriptor, VaultProperties, VaultResource, DEFAULT_VAULT_LOCATION,
};
use super::token::{Audience, BearerToken, TokenProvider};
use crate::azure_span;
use crate::config::{AzureSettings, JobParameters};
use crate::errors::{AkvError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace, Instrument};
use uuid::Uuid;

/// ARM API version for vault create/update.
pub const VAULT_API_VERSION: &str = "2018-02-14-preview";

/// ARM API version for the subscription resource listing.
pub const RESOURCES_API_VERSION: &str = "2018-05-01";

const MAX_CERTIFICATE_NAME_LEN: usize = 127;

const VAULT_RESOURCE_FILTER: &str =
    "%24filter=resourceType%20eq%20%27Microsoft.KeyVault%2Fvaults%27";

#[derive(Deserialize)]
struct AzureErrorBody {
    error: AzureErrorDetail,
}

#[derive(Deserialize)]
struct AzureErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Render an Azure error body as `"{code}: {message}"`, or the raw text.
fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<AzureErrorBody>(body) {
        Ok(parsed) if !parsed.error.code.is_empty() => {
            format!("{}: {}", parsed.error.code, parsed.error.message)
        }
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

#[derive(Serialize)]
struct EmptyRequest {}

/// Azure client bound to one job's parameters
#[derive(Debug, Clone)]
pub struct AzureClient {
    http: Client,
    tokens: TokenProvider,
    settings: AzureSettings,
    params: JobParameters,
}

impl AzureClient {
    pub fn new(http: Client, settings: AzureSettings, params: JobParameters) -> Self {
        let tokens = TokenProvider::new(http.clone(), settings.login_base());
        Self { http, tokens, settings, params }
    }

    async fn token(&self, audience: Audience) -> Result<BearerToken> {
        self.tokens
            .acquire_token(
                &self.params.tenant_id,
                &self.params.application_id,
                &self.params.client_secret,
                audience,
            )
            .await
    }

    fn request(&self, method: Method, url: &str, token: &BearerToken) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.http.request(method, url).bearer_auth(token.secret())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            AkvError::api_with_source(format!("{} {} failed", method, url), None, e)
        })?;

        self.handle_response(&method, url, response).await
    }

    /// Check the status, then deserialize the JSON body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: &str,
        response: Response,
    ) -> Result<T> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let error_text =
                response.text().await.unwrap_or_else(|_| "<unable to read error>".to_string());
            trace!("Error response:\n{}", error_text);

            let message =
                format!("{} {} failed with status {}", method, url, status.as_u16());
            let detail = describe_error_body(&error_text);
            return Err(if detail.is_empty() {
                AkvError::api(message, Some(status.as_u16()))
            } else {
                AkvError::api_with_source(message, Some(status.as_u16()), detail)
            });
        }

        let body = response.text().await.map_err(|e| {
            AkvError::api_with_source(
                format!("Failed to read response body from {} {}", method, url),
                Some(status.as_u16()),
                e,
            )
        })?;
        trace!("Response body:\n{}", body);

        serde_json::from_str(&body).map_err(|e| {
            AkvError::api_with_source(
                format!("Failed to deserialize response from {} {}", method, url),
                Some(status.as_u16()),
                e,
            )
        })
    }

    /// GET `first_url` and every `nextLink` after it with one token.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        first_url: String,
        audience: Audience,
    ) -> Result<Vec<T>> {
        let token = self.token(audience).await?;
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            let request = self.request(Method::GET, &url, &token);
            let page: Page<T> = self.send(Method::GET, &url, request).await?;
            visited.insert(url);
            next = page
                .next_page()
                .filter(|link| !visited.contains(*link))
                .map(str::to_string);
            items.extend(page.value);
        }
        let pages = visited.len();

        debug!(pages, items = items.len(), "Listing complete");
        Ok(items)
    }

    fn keyvault_url(&self, path: &str) -> String {
        format!(
            "{}{}?api-version={}",
            self.params.vault_base(),
            path,
            self.settings.keyvault_api_version
        )
    }

    /// URL of a certificate by name, optionally followed by an action segment.
    fn certificate_url(&self, alias: &str, action: Option<&str>) -> Result<String> {
        validate_certificate_name(alias)?;
        let path = match action {
            Some(action) => format!("/certificates/{}/{}", alias, action),
            None => format!("/certificates/{}", alias),
        };
        Ok(self.keyvault_url(&path))
    }

    fn vault_resource_url(&self) -> Result<String> {
        let subscription = JobParameters::require(&self.params.subscription_id, "SubscriptionId")?;
        let group = JobParameters::require(&self.params.resource_group_name, "ResourceGroupName")?;
        let vault = JobParameters::require(&self.params.vault_name, "VaultName")?;
        Ok(format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.KeyVault/vaults/{}?api-version={}",
            self.settings.management_base(),
            subscription,
            group,
            vault,
            VAULT_API_VERSION
        ))
    }

    fn create_vault_request(&self) -> Result<CreateVaultRequest> {
        let tenant_id = parse_guid(&self.params.tenant_id, "TenantId")?;
        let application_id = parse_guid(&self.params.application_id, "ApplicationId")?;

        Ok(CreateVaultRequest {
            location: DEFAULT_VAULT_LOCATION.to_string(),
            properties: VaultProperties {
                sku: Some(Sku::standard()),
                tenant_id: tenant_id.clone(),
                access_policies: vec![AccessPolicy {
                    tenant_id,
                    object_id: self.params.api_object_id.clone(),
                    application_id: Some(application_id),
                    permissions: Permissions::certificate_manager(),
                }],
                vault_uri: None,
            },
        })
    }

    fn require_vault_url(&self) -> Result<()> {
        JobParameters::require(&self.params.vault_url, "VaultUrl").map(|_| ())
    }
}

/// Key Vault object names are 1-127 characters of `0-9`, `a-z`, `A-Z` and `-`.
fn validate_certificate_name(alias: &str) -> Result<()> {
    let valid = !alias.is_empty()
        && alias.len() <= MAX_CERTIFICATE_NAME_LEN
        && alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AkvError::config(format!(
            "Certificate name '{}' must be 1-{} characters of 0-9, a-z, A-Z and '-'",
            alias, MAX_CERTIFICATE_NAME_LEN
        )))
    }
}

fn parse_guid(value: &str, field: &str) -> Result<String> {
    Uuid::parse_str(value.trim()).map(|id| id.to_string()).map_err(|e| {
        AkvError::config_with_source(format!("The store property '{}' must be a GUID", field), e)
    })
}

#[async_trait]
impl KeyVaultApi for AzureClient {
    async fn create_vault(&self) -> Result<VaultDescriptor> {
        let span = azure_span!("create_vault", vault = %self.params.vault_name);
        async move {
            let url = self.vault_resource_url()?;
            let body = self.create_vault_request()?;
            let token = self.token(Audience::Management).await?;

            let request = self.request(Method::PUT, &url, &token).json(&body);
            let resource: VaultResource = self.send(Method::PUT, &url, request).await?;
            Ok(VaultDescriptor::from(resource))
        }
        .instrument(span)
        .await
    }

    async fn list_vaults(&self) -> Result<Vec<VaultDescriptor>> {
        let span = azure_span!("list_vaults");
        async move {
            let subscription =
                JobParameters::require(&self.params.subscription_id, "SubscriptionId")?;
            let url = format!(
                "{}/subscriptions/{}/resources?{}&api-version={}",
                self.settings.management_base(),
                subscription,
                VAULT_RESOURCE_FILTER,
                RESOURCES_API_VERSION
            );

            let resources: Vec<VaultResource> =
                self.get_all_pages(url, Audience::Management).await?;
            Ok(resources.into_iter().map(VaultDescriptor::from).collect())
        }
        .instrument(span)
        .await
    }

    async fn get_certificates(&self) -> Result<Vec<CertificateSummary>> {
        let span = azure_span!("get_certificates", vault = %self.params.vault_url);
        async move {
            self.require_vault_url()?;
            let url = self.keyvault_url("/certificates");
            let items: Vec<CertificateItem> = self.get_all_pages(url, Audience::KeyVault).await?;
            items.into_iter().map(CertificateSummary::try_from).collect()
        }
        .instrument(span)
        .await
    }

    async fn get_certificate(&self, cert_id: &str) -> Result<CertificateRecord> {
        let span = azure_span!("get_certificate", cert_id = %cert_id);
        async move {
            let url = format!(
                "{}?api-version={}",
                cert_id.trim_end_matches('/'),
                self.settings.keyvault_api_version
            );
            let token = self.token(Audience::KeyVault).await?;
            let request = self.request(Method::GET, &url, &token);
            let bundle: CertificateBundle = self.send(Method::GET, &url, request).await?;
            CertificateRecord::try_from(bundle)
        }
        .instrument(span)
        .await
    }

    async fn import_certificate(
        &self,
        alias: &str,
        pfx: &[u8],
        password: &str,
    ) -> Result<CertificateRecord> {
        let span = azure_span!("import_certificate", alias = %alias);
        async move {
            self.require_vault_url()?;
            let url = self.certificate_url(alias, Some("import"))?;
            let body = ImportCertificateRequest::pkcs12(pfx, password);
            let token = self.token(Audience::KeyVault).await?;

            let request = self.request(Method::POST, &url, &token).json(&body);
            let bundle: CertificateBundle = self.send(Method::POST, &url, request).await?;
            CertificateRecord::try_from(bundle)
        }
        .instrument(span)
        .await
    }

    async fn delete_certificate(&self, alias: &str) -> Result<DeletedCertificate> {
        let span = azure_span!("delete_certificate", alias = %alias);
        async move {
            self.require_vault_url()?;
            let url = self.certificate_url(alias, None)?;
            let token = self.token(Audience::KeyVault).await?;

            let request = self.request(Method::DELETE, &url, &token);
            let bundle: DeletedCertificateBundle =
                self.send(Method::DELETE, &url, request).await?;
            DeletedCertificate::try_from(bundle)
        }
        .instrument(span)
        .await
    }

    async fn create_certificate_request(&self, alias: &str) -> Result<Vec<u8>> {
        let span = azure_span!("create_certificate_request", alias = %alias);
        async move {
            self.require_vault_url()?;
            let url = self.certificate_url(alias, Some("create"))?;
            let token = self.token(Audience::KeyVault).await?;

            let request = self.request(Method::POST, &url, &token).json(&EmptyRequest {});
            let bundle: CertificateOperationBundle =
                self.send(Method::POST, &url, request).await?;
            let operation = CertificateOperation::try_from(bundle)?;
            debug!(operation = %operation.id, status = ?operation.status, "Certificate operation started");
            Ok(operation.csr)
        }
        .instrument(span)
        .await
    }
}

/// Builds an [`AzureClient`] with a fresh HTTP client per invocation
#[derive(Debug, Clone, Default)]
pub struct AzureClientFactory {
    settings: AzureSettings,
}

impl AzureClientFactory {
    pub fn new(settings: AzureSettings) -> Self {
        Self { settings }
    }

}

impl ClientFactory for AzureClientFactory {
    fn build(&self, params: &JobParameters) -> Result<Arc<dyn KeyVaultApi>> {
        let http = Client::builder()
            .timeout(self.settings.http_timeout())
            .build()
            .map_err(|e| AkvError::config_with_source("Failed to build HTTP client", e))?;

        Ok(Arc::new(AzureClient::new(http, self.settings.clone(), params.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretString;
    use crate::errors::flatten_error_chain;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use base64::Engine;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TENANT: &str = "8b74a908-b153-41dc-bfe5-3ea7b22b9678";
    const APP: &str = "0f1c3a52-8b5e-4a3b-9a52-3d2f8f6a1e10";

    fn params(vault_url: &str) -> JobParameters {
        JobParameters {
            vault_url: vault_url.to_string(),
            tenant_id: TENANT.to_string(),
            client_secret: SecretString::new("secret"),
            application_id: APP.to_string(),
            subscription_id: "sub-1".to_string(),
            vault_name: "kv1".to_string(),
            resource_group_name: "rg1".to_string(),
            api_object_id: "obj-1".to_string(),
        }
    }

    async fn setup() -> (MockServer, Arc<dyn KeyVaultApi>) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/{}/oauth2/token", TENANT)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "access_token": "tok", "expires_in": "3599" })),
            )
            .mount(&server)
            .await;

        let settings = AzureSettings {
            login_endpoint: server.uri(),
            management_endpoint: server.uri(),
            ..AzureSettings::default()
        };
        let client = AzureClientFactory::new(settings).build(&params(&server.uri())).unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn test_get_certificates_follows_next_link() {
        let (server, client) = setup().await;
        let base = server.uri();

        Mock::given(method("GET"))
            .and(path("/certificates"))
            .and(query_param("api-version", "7.4"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{ "id": format!("{}/certificates/a", base), "x5t": URL_SAFE_NO_PAD.encode([1u8, 2]) }],
                "nextLink": format!("{}/certificates-page2?api-version=7.4", base)
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/certificates-page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{ "id": format!("{}/certificates/b", base) }],
                "nextLink": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let certs = client.get_certificates().await.unwrap();
        assert_eq!(certs.len(), 2);
        assert_eq!(certs[0].thumbprint, "0102");
        assert!(certs[1].id.ends_with("/certificates/b"));
    }

    #[tokio::test]
    async fn test_list_vaults_filters_and_paginates() {
        let (server, client) = setup().await;
        let base = server.uri();

        Mock::given(method("GET"))
            .and(path("/subscriptions/sub-1/resources"))
            .and(query_param("$filter", "resourceType eq 'Microsoft.KeyVault/vaults'"))
            .and(query_param("api-version", RESOURCES_API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{ "id": "/x/vaults/kv1", "name": "kv1", "type": "Microsoft.KeyVault/vaults", "location": "eastus", "tags": {} }],
                "nextLink": format!("{}/next-vaults", base)
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/next-vaults"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{ "id": "/x/vaults/kv2", "name": "kv2" }],
                "nextLink": ""
            })))
            .mount(&server)
            .await;

        let vaults = client.list_vaults().await.unwrap();
        let names: Vec<&str> = vaults.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["kv1", "kv2"]);
    }

    #[tokio::test]
    async fn test_create_vault_puts_access_policy() {
        let (server, client) = setup().await;

        Mock::given(method("PUT"))
            .and(path("/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.KeyVault/vaults/kv1"))
            .and(query_param("api-version", VAULT_API_VERSION))
            .and(wiremock::matchers::body_string_contains("\"location\":\"eastus\""))
            .and(wiremock::matchers::body_string_contains("\"objectId\":\"obj-1\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.KeyVault/vaults/kv1",
                "name": "kv1",
                "location": "eastus",
                "properties": { "tenantId": TENANT, "accessPolicies": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let vault = client.create_vault().await.unwrap();
        assert!(vault.id.contains("kv1"));
        assert_eq!(vault.tenant_id, TENANT);
    }

    #[tokio::test]
    async fn test_create_vault_rejects_non_guid_tenant() {
        let server = MockServer::start().await;
        let settings = AzureSettings {
            login_endpoint: server.uri(),
            management_endpoint: server.uri(),
            ..AzureSettings::default()
        };
        let mut bad = params(&server.uri());
        bad.tenant_id = "not-a-guid".to_string();
        let client = AzureClientFactory::new(settings).build(&bad).unwrap();

        let err = client.create_vault().await.unwrap_err();
        assert!(matches!(err, AkvError::Config { .. }));
        assert!(err.to_string().contains("TenantId"));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_import_certificate_body() {
        let (server, client) = setup().await;
        let pfx = [0x30u8, 0x82, 0x01];

        Mock::given(method("POST"))
            .and(path("/certificates/web/import"))
            .and(body_json(json!({
                "value": STANDARD.encode(pfx),
                "pwd": "pw",
                "policy": { "secret_props": { "contentType": "application/x-pkcs12" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": format!("{}/certificates/web/v1", server.uri()),
                "x5t": "AAE",
                "cer": STANDARD.encode([1u8, 2, 3])
            })))
            .mount(&server)
            .await;

        let record = client.import_certificate("web", &pfx, "pw").await.unwrap();
        assert_eq!(record.identifier.name, "web");
        assert_eq!(record.identifier.version, "v1");
        assert_eq!(record.cer, vec![1, 2, 3]);
        assert!(!record.thumbprint.is_empty());
    }

    #[tokio::test]
    async fn test_delete_certificate() {
        let (server, client) = setup().await;

        Mock::given(method("DELETE"))
            .and(path("/certificates/web"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": format!("{}/certificates/web/v1", server.uri()),
                "recoveryId": format!("{}/deletedcertificates/web", server.uri())
            })))
            .mount(&server)
            .await;

        let deleted = client.delete_certificate("web").await.unwrap();
        assert_eq!(deleted.identifier.name, "web");
        assert!(deleted.recovery_id.is_some());
    }

    #[tokio::test]
    async fn test_create_certificate_request_returns_csr() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/certificates/web/create"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "id": format!("{}/certificates/web/pending", server.uri()),
                "status": "inProgress",
                "csr": STANDARD.encode(b"csr-der")
            })))
            .mount(&server)
            .await;

        let csr = client.create_certificate_request("web").await.unwrap();
        assert_eq!(csr, b"csr-der".to_vec());
    }

    #[tokio::test]
    async fn test_error_status_carries_azure_message() {
        let (server, client) = setup().await;

        Mock::given(method("DELETE"))
            .and(path("/certificates/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": "CertificateNotFound", "message": "A certificate with (name/id) missing was not found" }
            })))
            .mount(&server)
            .await;

        let err = client.delete_certificate("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        let flat = flatten_error_chain(&err);
        assert!(flat.contains("failed with status 404"));
        assert!(flat.ends_with("CertificateNotFound: A certificate with (name/id) missing was not found"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_api_error() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/certificates/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let id = format!("{}/certificates/a", server.uri());
        let err = client.get_certificate(&id).await.unwrap_err();
        assert!(matches!(err, AkvError::Api { status: Some(200), source: Some(_), .. }));
    }

    #[tokio::test]
    async fn test_unreachable_vault_is_api_error_without_status() {
        let (server, _) = setup().await;
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let closed = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let settings = AzureSettings {
            login_endpoint: server.uri(),
            management_endpoint: server.uri(),
            ..AzureSettings::default()
        };
        let client = AzureClientFactory::new(settings).build(&params(&closed)).unwrap();

        let err = client.get_certificates().await.unwrap_err();
        assert!(matches!(err, AkvError::Api { status: None, source: Some(_), .. }));
    }

    #[tokio::test]
    async fn test_certificate_names_outside_key_vault_charset_are_rejected() {
        let (server, client) = setup().await;

        let err = client.delete_certificate("web/../victim").await.unwrap_err();
        assert!(matches!(err, AkvError::Config { .. }));
        assert!(err.to_string().contains("web/../victim"));

        let too_long = "a".repeat(128);
        for alias in ["a?b=1", "x#frag", "", "with space", too_long.as_str()] {
            let err = client.import_certificate(alias, &[1], "pw").await.unwrap_err();
            assert!(matches!(err, AkvError::Config { .. }), "alias {:?}", alias);
            let err = client.create_certificate_request(alias).await.unwrap_err();
            assert!(matches!(err, AkvError::Config { .. }), "alias {:?}", alias);
        }

        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_next_link_cycle_terminates() {
        let (server, client) = setup().await;
        let base = server.uri();

        Mock::given(method("GET"))
            .and(path("/certificates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{ "id": format!("{}/certificates/a", base) }],
                "nextLink": format!("{}/page-b", base)
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/page-b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{ "id": format!("{}/certificates/b", base) }],
                "nextLink": format!("{}/page-c", base)
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/page-c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{ "id": format!("{}/certificates/c", base) }],
                "nextLink": format!("{}/page-b", base)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let certs = client.get_certificates().await.unwrap();
        assert_eq!(certs.len(), 3);
    }

    #[test]
    fn test_describe_error_body_falls_back_to_text() {
        assert_eq!(describe_error_body("  plain failure "), "plain failure");
        assert_eq!(describe_error_body(""), "");
    }
}
