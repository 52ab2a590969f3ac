//! # Jobs
//!
//! The five job types the host can run against a Key Vault store, the
//! [`JobRegistry`] that dispatches host job classes to them, and the
//! [`Reporter`] that turns outcomes into [`JobResult`]s.
//!
//! Every job follows the same pipeline: [`initialize`] parses the store
//! properties and builds a client, the job performs its Azure call(s), the
//! result is interpreted, and at most one host callback fires. A failure at
//! any stage ends the job with a `Failure` result; callbacks not yet reached
//! are never invoked.

pub mod create;
pub mod discovery;
pub mod inventory;
pub mod kind;
pub mod management;
pub mod reenrollment;
pub mod registry;
pub mod result;

pub use create::CreateJob;
pub use discovery::DiscoveryJob;
pub use inventory::InventoryJob;
pub use kind::{JobKind, STORE_TYPE};
pub use management::ManagementJob;
pub use reenrollment::ReenrollmentJob;
pub use registry::JobRegistry;
pub use result::{JobResult, JobStatus, Reporter};

use crate::azure::{ClientFactory, KeyVaultApi};
use crate::config::JobParameters;
use crate::errors::{AkvError, Result};
use crate::host::{JobCallbacks, JobConfigInfo};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::trace;

/// Message reported when a vault create returns a vault other than the one requested.
pub const CREATE_VAULT_FAILED: &str = "The creation of the Azure Key Vault failed for an unknown reason. Check your job parameters and ensure permissions are correct.";

/// A job the host can invoke
///
/// Implementations must be Send + Sync so the registry can share them.
#[async_trait]
pub trait AgentJob: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> JobKind;

    /// Host job class string
    fn job_class(&self) -> &'static str {
        self.kind().as_str()
    }

    fn store_type(&self) -> &'static str {
        STORE_TYPE
    }

    /// Run the job. Never fails: every error becomes a `Failure` result.
    async fn process_job(&self, config: &JobConfigInfo, callbacks: &JobCallbacks) -> JobResult;
}

/// Parsed parameters plus the client built from them.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub params: JobParameters,
    pub client: Arc<dyn KeyVaultApi>,
}

/// Parse the store properties and build a fresh client for one invocation.
pub fn initialize(config: &JobConfigInfo, factory: &dyn ClientFactory) -> Result<JobContext> {
    let params = JobParameters::parse(&config.store.properties, &config.store.store_path)?;
    let client = factory.build(&params)?;
    trace!(vault_url = %params.vault_url, "Configuration complete");
    Ok(JobContext { params, client })
}

/// Create the configured vault and check Azure returned that vault.
pub(crate) async fn create_vault(
    kind: JobKind,
    context: &JobContext,
    success_message: Option<String>,
) -> JobResult {
    let vault = match context.client.create_vault().await {
        Ok(vault) => vault,
        Err(e) => return Reporter::failure(kind, &e, "Create Vault"),
    };

    let requested = context.params.vault_name.trim();
    if !requested.is_empty() && vault.id.contains(requested) {
        Reporter::success(kind, success_message)
    } else {
        Reporter::failure(kind, &AkvError::validation(CREATE_VAULT_FAILED), "Creating Azure Key Vault")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::azure::{MockClientFactory, MockKeyVault};
    use crate::host::JobConfigInfo;
    use serde_json::json;
    use std::sync::Arc;

    pub const VAULT_URL: &str = "https://test-vault.vault.azure.net";

    pub fn properties() -> String {
        json!({
            "TenantId": "8b74a908-b153-41dc-bfe5-3ea7b22b9678",
            "ClientSecret": "testClientSecret",
            "ApplicationId": "0f1c3a52-8b5e-4a3b-9a52-3d2f8f6a1e10",
            "SubscriptionId": "sub-1",
            "VaultName": "testVaultName",
            "ResourceGroupName": "testResourceGroupName",
            "APIObjectId": "obj-1"
        })
        .to_string()
    }

    pub fn config() -> JobConfigInfo {
        JobConfigInfo::new(properties(), VAULT_URL)
    }

    pub fn factory(mock: MockKeyVault) -> (Arc<MockClientFactory>, Arc<MockKeyVault>) {
        let mock = Arc::new(mock);
        (Arc::new(MockClientFactory::new(Arc::clone(&mock))), mock)
    }
}
