//! Management job: vault create, certificate add, certificate remove.

use super::{create_vault, initialize, AgentJob, JobContext, JobKind, JobResult, Reporter};
use crate::azure::ClientFactory;
use crate::errors::{AkvError, Result};
use crate::host::{JobCallbacks, JobConfigInfo, JobInfo, OperationType};
use crate::job_span;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::{debug, Instrument};

pub const MISSING_ALIAS: &str = "You must supply an alias for the certificate.";
pub const NOT_A_PFX: &str = "Certificate to add must be in a .PFX file format.";
pub const INVALID_OPERATION: &str = "Invalid Management Operation";

#[derive(Debug, Clone)]
pub struct ManagementJob {
    factory: Arc<dyn ClientFactory>,
}

impl ManagementJob {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self { factory }
    }

    async fn add(&self, context: &JobContext, job: &JobInfo) -> Result<String> {
        if job.pfx_password.is_blank() {
            return Err(AkvError::config(NOT_A_PFX));
        }
        let alias = job.alias.trim();
        if alias.is_empty() {
            return Err(AkvError::config(MISSING_ALIAS));
        }

        let pfx = decode_pfx(&job.entry_contents).map_err(|e| {
            AkvError::context(
                format!(
                    "An error occurred trying to decode the provided certificate with alias {}",
                    alias
                ),
                e,
            )
        })?;

        let record = context
            .client
            .import_certificate(alias, &pfx, job.pfx_password.expose_secret())
            .await
            .map_err(|e| {
                AkvError::context(
                    format!("An error occurred while adding {} to {}", alias, self.store_type()),
                    e,
                )
            })?;

        debug!(version = %record.identifier.version, thumbprint = %record.thumbprint, "Certificate imported");
        if record.identifier.version.is_empty() || record.thumbprint.is_empty() {
            return Err(AkvError::validation(format!(
                "Unable to add {} to {}. Check your network connection, ensure the password is correct, and that your API connection information is correct.",
                alias,
                self.store_type()
            )));
        }

        Ok(format!("Successfully Added {}", alias))
    }

    async fn remove(&self, context: &JobContext, job: &JobInfo) -> Result<String> {
        let alias = job.alias.trim();
        if alias.is_empty() {
            return Err(AkvError::config(MISSING_ALIAS));
        }

        let deleted = context.client.delete_certificate(alias).await.map_err(|e| {
            AkvError::context(
                format!("An error occurred while removing {} from {}", alias, self.store_type()),
                e,
            )
        })?;

        if deleted.identifier.name != alias {
            return Err(AkvError::validation(format!(
                "Unable to remove {} from {}. Check your network connection, ensure the password is correct, and that your API connection information is correct.",
                alias,
                self.store_type()
            )));
        }

        Ok(format!("Successfully removed {}", alias))
    }
}

fn decode_pfx(entry_contents: &str) -> Result<Vec<u8>> {
    let compact: String =
        entry_contents.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let pfx = STANDARD
        .decode(compact)
        .map_err(|e| AkvError::validation(e.to_string()))?;
    if pfx.is_empty() {
        return Err(AkvError::validation("The certificate contents are empty"));
    }
    Ok(pfx)
}

#[async_trait]
impl AgentJob for ManagementJob {
    fn kind(&self) -> JobKind {
        JobKind::Management
    }

    async fn process_job(&self, config: &JobConfigInfo, _callbacks: &JobCallbacks) -> JobResult {
        let span = job_span!(self.job_class(), self.store_type(), config.job.job_id);
        async move {
            let context = match initialize(config, self.factory.as_ref()) {
                Ok(context) => context,
                Err(e) => return Reporter::failure(self.kind(), &e, "Initialization"),
            };

            let operation = config.job.operation_type;
            debug!(operation = %operation, alias = %config.job.alias, "Management operation");

            match operation {
                OperationType::Create => {
                    create_vault(self.kind(), &context, Some("Create Vault Complete".to_string()))
                        .await
                }
                OperationType::Add => match self.add(&context, &config.job).await {
                    Ok(message) => Reporter::success(self.kind(), Some(message)),
                    Err(e) => Reporter::failure(self.kind(), &e, "Management Add"),
                },
                OperationType::Remove => match self.remove(&context, &config.job).await {
                    Ok(message) => Reporter::success(self.kind(), Some(message)),
                    Err(e) => Reporter::failure(self.kind(), &e, "Management Remove"),
                },
                OperationType::Inventory | OperationType::Unknown => Reporter::failure(
                    self.kind(),
                    &AkvError::validation(INVALID_OPERATION),
                    "Management",
                ),
            }
        }
        .instrument(span)
        .await
    }
}
