//! Wire models for Azure Resource Manager and the Key Vault data plane.
//!
//! Raw response shapes deserialize leniently (missing fields default) and are
//! converted into the domain types the jobs consume: [`VaultDescriptor`],
//! [`CertificateSummary`], [`CertificateRecord`], [`DeletedCertificate`], and
//! [`CertificateOperation`].

use crate::errors::{AkvError, Result};
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

/// Certificate permissions granted to the service principal on vaults it creates.
pub const CERTIFICATE_PERMISSIONS: [&str; 14] = [
    "get",
    "list",
    "delete",
    "create",
    "import",
    "update",
    "managecontacts",
    "getissuers",
    "listissuers",
    "setissuers",
    "deleteissuers",
    "manageissuers",
    "recover",
    "purge",
];

/// Region new vaults are created in.
pub const DEFAULT_VAULT_LOCATION: &str = "eastus";

/// One page of a paginated Azure listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    #[serde(default, rename = "nextLink")]
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    /// Continuation URL, if the service reported a further page.
    pub fn next_page(&self) -> Option<&str> {
        self.next_link.as_deref().map(str::trim).filter(|link| !link.is_empty())
    }
}

// ============================================================================
// Resource Manager
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateVaultRequest {
    pub location: String,
    pub properties: VaultProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,

    #[serde(default)]
    pub tenant_id: String,

    #[serde(default)]
    pub access_policies: Vec<AccessPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    pub family: String,
    pub name: String,
}

impl Sku {
    pub fn standard() -> Self {
        Self { family: "A".to_string(), name: "standard".to_string() }
    }
}

/// Vault-level grant of operation permissions to one principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicy {
    #[serde(default)]
    pub tenant_id: String,

    #[serde(default)]
    pub object_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,

    #[serde(default)]
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub secrets: Vec<String>,
    #[serde(default)]
    pub certificates: Vec<String>,
    #[serde(default)]
    pub storage: Vec<String>,
}

impl Permissions {
    /// Full certificate permission set, no key, secret, or storage permissions.
    pub fn certificate_manager() -> Self {
        Self {
            certificates: CERTIFICATE_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }
}

/// ARM representation of a vault, as returned by the vault PUT and the
/// resource listing. The listing omits `properties`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VaultResource {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub properties: VaultProperties,
}

/// What the jobs know about a vault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultDescriptor {
    pub id: String,
    pub name: String,
    pub location: String,
    pub tenant_id: String,
    pub access_policy: Option<AccessPolicy>,
}

impl From<VaultResource> for VaultDescriptor {
    fn from(resource: VaultResource) -> Self {
        let VaultResource { id, name, location, properties } = resource;
        Self {
            id,
            name,
            location,
            tenant_id: properties.tenant_id,
            access_policy: properties.access_policies.into_iter().next(),
        }
    }
}

// ============================================================================
// Key Vault data plane
// ============================================================================

/// Parsed certificate identifier: `{vault}/certificates/{name}[/{version}]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateIdentifier {
    pub vault_url: String,
    pub name: String,
    pub version: String,
}

impl CertificateIdentifier {
    pub fn parse(id: &str) -> Result<Self> {
        let url = Url::parse(id).map_err(|e| {
            AkvError::api_with_source(format!("Invalid certificate identifier '{}'", id), None, e)
        })?;

        let segments: Vec<&str> =
            url.path_segments().map(|s| s.filter(|seg| !seg.is_empty()).collect()).unwrap_or_default();

        let (name, version) = match segments.as_slice() {
            ["certificates", name] | ["deletedcertificates", name] => (*name, ""),
            ["certificates", name, version] => (*name, *version),
            _ => {
                return Err(AkvError::api(
                    format!("Invalid certificate identifier '{}'", id),
                    None,
                ))
            }
        };

        let vault_url = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
        let vault_url = match url.port() {
            Some(port) => format!("{}:{}", vault_url, port),
            None => vault_url,
        };

        Ok(Self { vault_url, name: name.to_string(), version: version.to_string() })
    }
}

/// List entry: the listing only carries the id and thumbprint.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateItem {
    pub id: String,

    #[serde(default)]
    pub x5t: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    pub id: String,
    pub thumbprint: String,
}

impl TryFrom<CertificateItem> for CertificateSummary {
    type Error = AkvError;

    fn try_from(item: CertificateItem) -> Result<Self> {
        let thumbprint = thumbprint_hex(item.x5t.as_deref())?;
        Ok(Self { id: item.id, thumbprint })
    }
}

/// Full certificate as returned by get and import.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateBundle {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub x5t: Option<String>,

    #[serde(default)]
    pub cer: Option<String>,

    #[serde(default)]
    pub csr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub id: String,
    pub identifier: CertificateIdentifier,
    /// DER-encoded certificate
    pub cer: Vec<u8>,
    /// Uppercase hex SHA-1 thumbprint, empty when Azure returned none
    pub thumbprint: String,
    pub csr: Option<Vec<u8>>,
}

impl TryFrom<CertificateBundle> for CertificateRecord {
    type Error = AkvError;

    fn try_from(bundle: CertificateBundle) -> Result<Self> {
        let identifier = CertificateIdentifier::parse(&bundle.id)?;
        let cer = match bundle.cer.as_deref() {
            Some(encoded) => decode_base64(encoded, "cer")?,
            None => Vec::new(),
        };
        let thumbprint = thumbprint_hex(bundle.x5t.as_deref())?;
        let csr = match bundle.csr.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(encoded) => Some(decode_base64(encoded, "csr")?),
            None => None,
        };
        Ok(Self { id: bundle.id, identifier, cer, thumbprint, csr })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCertificateBundle {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub recovery_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedCertificate {
    pub id: String,
    pub identifier: CertificateIdentifier,
    pub recovery_id: Option<String>,
}

impl TryFrom<DeletedCertificateBundle> for DeletedCertificate {
    type Error = AkvError;

    fn try_from(bundle: DeletedCertificateBundle) -> Result<Self> {
        let identifier = CertificateIdentifier::parse(&bundle.id)?;
        Ok(Self { id: bundle.id, identifier, recovery_id: bundle.recovery_id })
    }
}

/// Pending certificate operation returned by a create request.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateOperationBundle {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub csr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateOperation {
    pub id: String,
    pub status: Option<String>,
    pub csr: Vec<u8>,
}

impl TryFrom<CertificateOperationBundle> for CertificateOperation {
    type Error = AkvError;

    fn try_from(bundle: CertificateOperationBundle) -> Result<Self> {
        let csr = match bundle.csr.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(encoded) => decode_base64(encoded, "csr")?,
            None => {
                return Err(AkvError::api(
                    format!("Certificate operation '{}' did not return a CSR", bundle.id),
                    None,
                ))
            }
        };
        Ok(Self { id: bundle.id, status: bundle.status, csr })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportCertificateRequest {
    pub value: String,
    pub pwd: String,
    pub policy: ImportPolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportPolicy {
    pub secret_props: SecretProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecretProperties {
    #[serde(rename = "contentType")]
    pub content_type: String,
}

impl ImportCertificateRequest {
    pub fn pkcs12(pfx: &[u8], password: &str) -> Self {
        Self {
            value: STANDARD.encode(pfx),
            pwd: password.to_string(),
            policy: ImportPolicy {
                secret_props: SecretProperties {
                    content_type: "application/x-pkcs12".to_string(),
                },
            },
        }
    }
}

/// Key Vault encodes byte fields as base64, sometimes URL-safe and unpadded.
pub fn decode_base64(encoded: &str, field: &str) -> Result<Vec<u8>> {
    let encoded = encoded.trim();
    STANDARD
        .decode(encoded)
        .or_else(|_| STANDARD_NO_PAD.decode(encoded))
        .or_else(|_| URL_SAFE_NO_PAD.decode(encoded))
        .or_else(|_| URL_SAFE.decode(encoded))
        .map_err(|e| {
            AkvError::api_with_source(format!("Field '{}' is not valid base64", field), None, e)
        })
}

fn thumbprint_hex(x5t: Option<&str>) -> Result<String> {
    match x5t.map(str::trim).filter(|t| !t.is_empty()) {
        Some(encoded) => Ok(hex::encode_upper(decode_base64(encoded, "x5t")?)),
        None => Ok(String::new()),
    }
}
