//! Create job: provisions the configured vault.

use super::{create_vault, initialize, AgentJob, JobKind, JobResult, Reporter};
use crate::azure::ClientFactory;
use crate::host::{JobCallbacks, JobConfigInfo};
use crate::job_span;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct CreateJob {
    factory: Arc<dyn ClientFactory>,
}

impl CreateJob {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl AgentJob for CreateJob {
    fn kind(&self) -> JobKind {
        JobKind::Create
    }

    async fn process_job(&self, config: &JobConfigInfo, _callbacks: &JobCallbacks) -> JobResult {
        let span = job_span!(self.job_class(), self.store_type(), config.job.job_id);
        async move {
            let context = match initialize(config, self.factory.as_ref()) {
                Ok(context) => context,
                Err(e) => return Reporter::failure(self.kind(), &e, "Initialization"),
            };

            create_vault(self.kind(), &context, None).await
        }
        .instrument(span)
        .await
    }
}
