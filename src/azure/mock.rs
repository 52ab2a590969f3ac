//! In-memory [`KeyVaultApi`] for exercising jobs without Azure.
//!
//! Holds a fake vault listing and certificate store, records every call, and
//! can be told to fail any operation.

use super::api::{ClientFactory, KeyVaultApi};
use super::models::{
    CertificateIdentifier, CertificateRecord, CertificateSummary, DeletedCertificate,
    VaultDescriptor,
};
use crate::config::JobParameters;
use crate::errors::{AkvError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// Operation selector for [`MockKeyVault::failing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    CreateVault,
    ListVaults,
    GetCertificates,
    GetCertificate,
    ImportCertificate,
    DeleteCertificate,
    CreateCertificateRequest,
}

/// A recorded call, in invocation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateVault,
    ListVaults,
    GetCertificates,
    GetCertificate(String),
    ImportCertificate { alias: String, pfx: Vec<u8>, password: String },
    DeleteCertificate(String),
    CreateCertificateRequest(String),
}

#[derive(Debug, Default)]
struct MockState {
    certificates: BTreeMap<String, CertificateRecord>,
    vaults: Vec<VaultDescriptor>,
    created_vault: Option<VaultDescriptor>,
    import_result: Option<CertificateRecord>,
    delete_result: Option<DeletedCertificate>,
    csr: Option<Vec<u8>>,
    failures: HashMap<MockOperation, String>,
    calls: Vec<MockCall>,
}

#[derive(Debug)]
pub struct MockKeyVault {
    vault_url: String,
    vault_name: String,
    state: Mutex<MockState>,
}

impl Default for MockKeyVault {
    fn default() -> Self {
        Self::new("https://mock-vault.vault.azure.net")
    }
}

impl MockKeyVault {
    pub fn new(vault_url: impl Into<String>) -> Self {
        Self {
            vault_url: vault_url.into().trim_end_matches('/').to_string(),
            vault_name: "mock-vault".to_string(),
            state: Mutex::new(MockState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Name reported by the default `create_vault` response.
    pub fn with_vault_name(mut self, name: impl Into<String>) -> Self {
        self.vault_name = name.into();
        self
    }

    /// Vaults returned by `list_vaults`.
    pub fn with_vaults<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state().vaults = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                VaultDescriptor {
                    id: mock_vault_id(&name),
                    name,
                    location: "eastus".to_string(),
                    ..VaultDescriptor::default()
                }
            })
            .collect();
        self
    }

    /// Seed a stored certificate with version `v1`.
    pub fn with_certificate(self, name: &str, cer: Vec<u8>, thumbprint: &str) -> Self {
        let record = self.record(name, "v1", cer, thumbprint);
        self.state().certificates.insert(name.to_string(), record);
        self
    }

    /// Override the `create_vault` response.
    pub fn with_created_vault(self, vault: VaultDescriptor) -> Self {
        self.state().created_vault = Some(vault);
        self
    }

    /// Override the `import_certificate` response.
    pub fn with_import_result(self, record: CertificateRecord) -> Self {
        self.state().import_result = Some(record);
        self
    }

    /// Override the `delete_certificate` response.
    pub fn with_delete_result(self, deleted: DeletedCertificate) -> Self {
        self.state().delete_result = Some(deleted);
        self
    }

    pub fn with_csr(self, csr: Vec<u8>) -> Self {
        self.state().csr = Some(csr);
        self
    }

    /// Make `operation` fail with an API error carrying `message`.
    pub fn failing(self, operation: MockOperation, message: impl Into<String>) -> Self {
        self.state().failures.insert(operation, message.into());
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    pub fn certificate_names(&self) -> Vec<String> {
        self.state().certificates.keys().cloned().collect()
    }

    /// Build a record the way Key Vault would identify it in this vault.
    pub fn record(&self, name: &str, version: &str, cer: Vec<u8>, thumbprint: &str) -> CertificateRecord {
        let id = format!("{}/certificates/{}/{}", self.vault_url, name, version);
        CertificateRecord {
            identifier: CertificateIdentifier {
                vault_url: self.vault_url.clone(),
                name: name.to_string(),
                version: version.to_string(),
            },
            id,
            cer,
            thumbprint: thumbprint.to_string(),
            csr: None,
        }
    }

    fn begin(&self, call: MockCall, operation: MockOperation) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        state.calls.push(call);
        if let Some(message) = state.failures.get(&operation).cloned() {
            return Err(AkvError::api(message, Some(500)));
        }
        Ok(state)
    }
}

fn mock_vault_id(name: &str) -> String {
    format!(
        "/subscriptions/mock/resourceGroups/mock/providers/Microsoft.KeyVault/vaults/{}",
        name
    )
}

fn not_found(what: &str) -> AkvError {
    AkvError::api(format!("CertificateNotFound: {} was not found", what), Some(404))
}

#[async_trait]
impl KeyVaultApi for MockKeyVault {
    async fn create_vault(&self) -> Result<VaultDescriptor> {
        let state = self.begin(MockCall::CreateVault, MockOperation::CreateVault)?;
        Ok(state.created_vault.clone().unwrap_or_else(|| VaultDescriptor {
            id: mock_vault_id(&self.vault_name),
            name: self.vault_name.clone(),
            location: "eastus".to_string(),
            ..VaultDescriptor::default()
        }))
    }

    async fn list_vaults(&self) -> Result<Vec<VaultDescriptor>> {
        let state = self.begin(MockCall::ListVaults, MockOperation::ListVaults)?;
        Ok(state.vaults.clone())
    }

    async fn get_certificates(&self) -> Result<Vec<CertificateSummary>> {
        let state = self.begin(MockCall::GetCertificates, MockOperation::GetCertificates)?;
        Ok(state
            .certificates
            .values()
            .map(|record| CertificateSummary {
                id: record.id.clone(),
                thumbprint: record.thumbprint.clone(),
            })
            .collect())
    }

    async fn get_certificate(&self, cert_id: &str) -> Result<CertificateRecord> {
        let state = self.begin(
            MockCall::GetCertificate(cert_id.to_string()),
            MockOperation::GetCertificate,
        )?;
        state
            .certificates
            .values()
            .find(|record| record.id == cert_id)
            .cloned()
            .ok_or_else(|| not_found(cert_id))
    }

    async fn import_certificate(
        &self,
        alias: &str,
        pfx: &[u8],
        password: &str,
    ) -> Result<CertificateRecord> {
        let mut state = self.begin(
            MockCall::ImportCertificate {
                alias: alias.to_string(),
                pfx: pfx.to_vec(),
                password: password.to_string(),
            },
            MockOperation::ImportCertificate,
        )?;

        let record = match state.import_result.clone() {
            Some(record) => record,
            None => self.record(alias, "v1", pfx.to_vec(), "0123456789ABCDEF0123456789ABCDEF01234567"),
        };
        state.certificates.insert(alias.to_string(), record.clone());
        Ok(record)
    }

    async fn delete_certificate(&self, alias: &str) -> Result<DeletedCertificate> {
        let mut state = self.begin(
            MockCall::DeleteCertificate(alias.to_string()),
            MockOperation::DeleteCertificate,
        )?;

        if let Some(deleted) = state.delete_result.clone() {
            state.certificates.remove(alias);
            return Ok(deleted);
        }

        let removed = state.certificates.remove(alias).ok_or_else(|| not_found(alias))?;
        Ok(DeletedCertificate {
            id: removed.id,
            identifier: removed.identifier,
            recovery_id: Some(format!("{}/deletedcertificates/{}", self.vault_url, alias)),
        })
    }

    async fn create_certificate_request(&self, alias: &str) -> Result<Vec<u8>> {
        let state = self.begin(
            MockCall::CreateCertificateRequest(alias.to_string()),
            MockOperation::CreateCertificateRequest,
        )?;
        Ok(state.csr.clone().unwrap_or_else(|| b"mock-csr".to_vec()))
    }
}

/// [`ClientFactory`] handing out a shared [`MockKeyVault`]
#[derive(Debug)]
pub struct MockClientFactory {
    client: Arc<MockKeyVault>,
    build_error: Option<String>,
    built_for: Mutex<Vec<JobParameters>>,
}

impl MockClientFactory {
    pub fn new(client: Arc<MockKeyVault>) -> Self {
        Self { client, build_error: None, built_for: Mutex::new(Vec::new()) }
    }

    /// A factory whose `build` always fails with a config error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            client: Arc::new(MockKeyVault::default()),
            build_error: Some(message.into()),
            built_for: Mutex::new(Vec::new()),
        }
    }

    /// Parameters of every successful `build`, in order.
    pub fn built_for(&self) -> Vec<JobParameters> {
        self.built_for.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}

impl ClientFactory for MockClientFactory {
    fn build(&self, params: &JobParameters) -> Result<Arc<dyn KeyVaultApi>> {
        if let Some(message) = &self.build_error {
            return Err(AkvError::config(message.clone()));
        }
        self.built_for
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(params.clone());
        let client: Arc<dyn KeyVaultApi> = self.client.clone();
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_import_then_list_then_delete() {
        let mock = MockKeyVault::new("https://kv.vault.azure.net/");
        let record = mock.import_certificate("web", b"pfx", "pw").await.unwrap();
        assert_eq!(record.id, "https://kv.vault.azure.net/certificates/web/v1");

        let listed = mock.get_certificates().await.unwrap();
        assert_eq!(listed.len(), 1);

        let deleted = mock.delete_certificate("web").await.unwrap();
        assert_eq!(deleted.identifier.name, "web");
        assert!(mock.certificate_names().is_empty());
        assert_eq!(mock.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_returned() {
        let mock = MockKeyVault::default().failing(MockOperation::ListVaults, "boom");
        let err = mock.list_vaults().await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(mock.calls(), vec![MockCall::ListVaults]);
    }

    #[tokio::test]
    async fn test_delete_unknown_alias_is_not_found() {
        let mock = MockKeyVault::default();
        let err = mock.delete_certificate("nope").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
