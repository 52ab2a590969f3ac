//! Discovery job: reports the vaults in the subscription to the host.

use super::{initialize, AgentJob, JobKind, JobResult, Reporter};
use crate::azure::ClientFactory;
use crate::host::{JobCallbacks, JobConfigInfo};
use crate::job_span;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, Instrument};

#[derive(Debug, Clone)]
pub struct DiscoveryJob {
    factory: Arc<dyn ClientFactory>,
}

impl DiscoveryJob {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl AgentJob for DiscoveryJob {
    fn kind(&self) -> JobKind {
        JobKind::Discovery
    }

    async fn process_job(&self, config: &JobConfigInfo, callbacks: &JobCallbacks) -> JobResult {
        let span = job_span!(self.job_class(), self.store_type(), config.job.job_id);
        async move {
            let context = match initialize(config, self.factory.as_ref()) {
                Ok(context) => context,
                Err(e) => return Reporter::failure(self.kind(), &e, "Initialization"),
            };

            let vaults = match context.client.list_vaults().await {
                Ok(vaults) => vaults,
                Err(e) => return Reporter::failure(self.kind(), &e, "List Vaults"),
            };

            let names: Vec<String> = vaults.into_iter().map(|vault| vault.name).collect();
            debug!(count = names.len(), "Discovered vaults");
            callbacks.submit_discovery(names);

            Reporter::success(self.kind(), None)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::{MockKeyVault, MockOperation};
    use crate::jobs::test_support::*;
    use crate::jobs::JobStatus;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    fn recording() -> (Arc<Mutex<Vec<Vec<String>>>>, JobCallbacks) {
        let submissions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&submissions);
        let callbacks =
            JobCallbacks::default().on_discovery(move |names| sink.lock().unwrap().push(names));
        (submissions, callbacks)
    }

    #[tokio::test]
    async fn test_empty_vault_list_still_reports() {
        let (factory, _) = factory(MockKeyVault::default());
        let (submissions, callbacks) = recording();

        let result = DiscoveryJob::new(factory).process_job(&config(), &callbacks).await;

        assert_eq!(result.status, JobStatus::Success);
        assert_eq!(result.message, "Discovery Complete");
        assert_eq!(*submissions.lock().unwrap(), vec![Vec::<String>::new()]);
    }

    #[tokio::test]
    async fn test_reports_vault_names_and_is_idempotent() {
        let (factory, _) = factory(MockKeyVault::default().with_vaults(["kv-a", "kv-b", "kv-c"]));
        let (submissions, callbacks) = recording();
        let job = DiscoveryJob::new(factory);

        job.process_job(&config(), &callbacks).await;
        job.process_job(&config(), &callbacks).await;

        let submissions = submissions.lock().unwrap();
        assert_eq!(submissions.len(), 2);
        let first: BTreeSet<&String> = submissions[0].iter().collect();
        let second: BTreeSet<&String> = submissions[1].iter().collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failure_skips_callback() {
        let mock = MockKeyVault::default().failing(MockOperation::ListVaults, "AuthorizationFailed");
        let (factory, _) = factory(mock);
        let (submissions, callbacks) = recording();

        let result = DiscoveryJob::new(factory).process_job(&config(), &callbacks).await;

        assert_eq!(result.status, JobStatus::Failure);
        assert!(result.message.contains("AuthorizationFailed"));
        assert!(submissions.lock().unwrap().is_empty());
    }
}
