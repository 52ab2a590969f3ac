//! Reenrollment job: asks Key Vault for a CSR for a new version of a certificate.

use super::management::MISSING_ALIAS;
use super::{initialize, AgentJob, JobKind, JobResult, Reporter};
use crate::azure::ClientFactory;
use crate::errors::AkvError;
use crate::host::{JobCallbacks, JobConfigInfo};
use crate::job_span;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct ReenrollmentJob {
    factory: Arc<dyn ClientFactory>,
}

impl ReenrollmentJob {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl AgentJob for ReenrollmentJob {
    fn kind(&self) -> JobKind {
        JobKind::Reenrollment
    }

    async fn process_job(&self, config: &JobConfigInfo, callbacks: &JobCallbacks) -> JobResult {
        let span = job_span!(self.job_class(), self.store_type(), config.job.job_id);
        async move {
            let context = match initialize(config, self.factory.as_ref()) {
                Ok(context) => context,
                Err(e) => return Reporter::failure(self.kind(), &e, "Initialization"),
            };

            let alias = config.job.alias.trim();
            if alias.is_empty() {
                return Reporter::failure(
                    self.kind(),
                    &AkvError::config(MISSING_ALIAS),
                    "Reenrollment API Call",
                );
            }

            let csr = match context.client.create_certificate_request(alias).await {
                Ok(csr) => csr,
                Err(e) => return Reporter::failure(self.kind(), &e, "Reenrollment API Call"),
            };

            callbacks.submit_enrollment(STANDARD.encode(csr));
            Reporter::success(self.kind(), Some("Reenrollment Complete".to_string()))
        }
        .instrument(span)
        .await
    }
}
