//! Inventory job: reports every certificate in the vault to the host.

use super::{initialize, AgentJob, JobContext, JobKind, JobResult, Reporter};
use crate::azure::ClientFactory;
use crate::errors::Result;
use crate::host::{InventoryItem, JobCallbacks, JobConfigInfo};
use crate::job_span;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::{debug, Instrument};

#[derive(Debug, Clone)]
pub struct InventoryJob {
    factory: Arc<dyn ClientFactory>,
}

impl InventoryJob {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self { factory }
    }

    /// List, then fetch each certificate in turn; the listing carries no DER.
    async fn collect(&self, context: &JobContext) -> Result<Vec<InventoryItem>> {
        let summaries = context.client.get_certificates().await?;
        debug!("Found {} total certificates in Azure Key Vault", summaries.len());

        let mut items = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            let certificate = context.client.get_certificate(&summary.id).await?;
            items.push(InventoryItem::from_vault(
                certificate.identifier.name,
                STANDARD.encode(&certificate.cer),
            ));
        }
        Ok(items)
    }
}

#[async_trait]
impl AgentJob for InventoryJob {
    fn kind(&self) -> JobKind {
        JobKind::Inventory
    }

    async fn process_job(&self, config: &JobConfigInfo, callbacks: &JobCallbacks) -> JobResult {
        let span = job_span!(self.job_class(), self.store_type(), config.job.job_id);
        async move {
            let context = match initialize(config, self.factory.as_ref()) {
                Ok(context) => context,
                Err(e) => return Reporter::failure(self.kind(), &e, "Initialization"),
            };

            let items = match self.collect(&context).await {
                Ok(items) => items,
                Err(e) => return Reporter::failure(self.kind(), &e, "Collection"),
            };

            callbacks.submit_inventory(items);
            Reporter::success(self.kind(), None)
        }
        .instrument(span)
        .await
    }
}
