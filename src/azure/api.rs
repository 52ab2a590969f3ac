//! Key Vault API trait and client factory
//!
//! Defines the seam between the jobs and Azure. Jobs only ever see a
//! `dyn KeyVaultApi` built by a [`ClientFactory`], which lets tests swap the
//! reqwest-backed client for an in-memory one.

use super::models::{CertificateRecord, CertificateSummary, DeletedCertificate, VaultDescriptor};
use crate::config::JobParameters;
use crate::errors::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Vault and certificate operations a job can perform
///
/// Implementations must be Send + Sync for use in async contexts. Every
/// implementation is bound to one [`JobParameters`] at construction time.
#[async_trait]
pub trait KeyVaultApi: Send + Sync + std::fmt::Debug {
    /// Create (or update) the configured vault with a standard SKU and a
    /// certificate-management access policy for the service principal
    async fn create_vault(&self) -> Result<VaultDescriptor>;

    /// List every vault in the configured subscription
    async fn list_vaults(&self) -> Result<Vec<VaultDescriptor>>;

    /// List the certificates stored in the configured vault, all pages
    async fn get_certificates(&self) -> Result<Vec<CertificateSummary>>;

    /// Fetch one certificate by its full identifier URL
    async fn get_certificate(&self, cert_id: &str) -> Result<CertificateRecord>;

    /// Import a PKCS#12 bundle under `alias`
    async fn import_certificate(
        &self,
        alias: &str,
        pfx: &[u8],
        password: &str,
    ) -> Result<CertificateRecord>;

    /// Delete the certificate stored under `alias`
    async fn delete_certificate(&self, alias: &str) -> Result<DeletedCertificate>;

    /// Start a new version of `alias` using its existing policy and return
    /// the DER-encoded certificate signing request
    async fn create_certificate_request(&self, alias: &str) -> Result<Vec<u8>>;
}

/// Builds a fresh [`KeyVaultApi`] for each job invocation
pub trait ClientFactory: Send + Sync + std::fmt::Debug {
    fn build(&self, params: &JobParameters) -> Result<Arc<dyn KeyVaultApi>>;
}
