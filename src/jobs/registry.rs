//! Job registry
//!
//! Maps host job classes to job implementations. The host hands over a job
//! class string; the registry parses it and runs the matching job.

use super::{
    AgentJob, CreateJob, DiscoveryJob, InventoryJob, JobKind, JobResult, JobStatus,
    ManagementJob, ReenrollmentJob, Reporter,
};
use crate::azure::ClientFactory;
use crate::errors::AkvError;
use crate::host::{JobCallbacks, JobConfigInfo};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Dispatch table from [`JobKind`] to job
#[derive(Default)]
pub struct JobRegistry {
    jobs: HashMap<JobKind, Arc<dyn AgentJob>>,
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRegistry").field("jobs", &self.registered_jobs()).finish()
    }
}

impl JobRegistry {
    /// Create a registry with no jobs
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all five jobs sharing one client factory
    pub fn with_defaults(factory: Arc<dyn ClientFactory>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CreateJob::new(Arc::clone(&factory))));
        registry.register(Arc::new(DiscoveryJob::new(Arc::clone(&factory))));
        registry.register(Arc::new(InventoryJob::new(Arc::clone(&factory))));
        registry.register(Arc::new(ManagementJob::new(Arc::clone(&factory))));
        registry.register(Arc::new(ReenrollmentJob::new(factory)));
        registry
    }

    /// Register a job, replacing any job of the same kind
    pub fn register(&mut self, job: Arc<dyn AgentJob>) {
        let kind = job.kind();
        info!(job_class = %kind, store_type = job.store_type(), "Registering job");
        self.jobs.insert(kind, job);
    }

    pub fn get(&self, kind: JobKind) -> Option<Arc<dyn AgentJob>> {
        self.jobs.get(&kind).cloned()
    }

    pub fn has_job(&self, kind: JobKind) -> bool {
        self.jobs.contains_key(&kind)
    }

    /// Registered job kinds, sorted
    pub fn registered_jobs(&self) -> Vec<JobKind> {
        let mut kinds: Vec<JobKind> = self.jobs.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Run the job registered for `kind`
    pub async fn process(
        &self,
        kind: JobKind,
        config: &JobConfigInfo,
        callbacks: &JobCallbacks,
    ) -> JobResult {
        match self.jobs.get(&kind) {
            Some(job) => {
                debug!(job_class = %kind, "Dispatching job");
                job.process_job(config, callbacks).await
            }
            None => Reporter::failure(
                kind,
                &AkvError::config(format!("No job registered for job class '{}'", kind)),
                "Dispatch",
            ),
        }
    }

    /// Parse a host job class string, then run the matching job
    pub async fn process_class(
        &self,
        job_class: &str,
        config: &JobConfigInfo,
        callbacks: &JobCallbacks,
    ) -> JobResult {
        match job_class.parse::<JobKind>() {
            Ok(kind) => self.process(kind, config, callbacks).await,
            Err(_) => {
                let message = format!("No job registered for job class '{}'", job_class);
                error!(job_class = %job_class, "{}", message);
                JobResult { status: JobStatus::Failure, message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::MockKeyVault;
    use crate::jobs::test_support::*;

    #[test]
    fn test_with_defaults_registers_all_jobs() {
        let (factory, _) = factory(MockKeyVault::default());
        let registry = JobRegistry::with_defaults(factory);

        assert_eq!(registry.registered_jobs(), JobKind::ALL.to_vec());
        for kind in JobKind::ALL {
            assert!(registry.has_job(kind));
            let job = registry.get(kind).unwrap();
            assert_eq!(job.kind(), kind);
            assert_eq!(job.job_class(), kind.as_str());
            assert_eq!(job.store_type(), "AKV");
        }
    }

    #[tokio::test]
    async fn test_empty_registry_reports_missing_job() {
        let registry = JobRegistry::new();
        let result =
            registry.process(JobKind::Inventory, &config(), &JobCallbacks::default()).await;

        assert_eq!(result.status, JobStatus::Failure);
        assert_eq!(result.message, "No job registered for job class 'Inventory'");
    }

    #[tokio::test]
    async fn test_process_class_dispatches_enrollment() {
        let (factory, _) = factory(MockKeyVault::default());
        let registry = JobRegistry::with_defaults(factory);

        let result = registry
            .process_class("Enrollment", &config().with_alias("web"), &JobCallbacks::default())
            .await;
        assert_eq!(result.message, "Reenrollment Complete");
    }

    #[tokio::test]
    async fn test_process_class_unknown() {
        let registry = JobRegistry::new();
        let result =
            registry.process_class("Rotate", &config(), &JobCallbacks::default()).await;

        assert_eq!(result.status, JobStatus::Failure);
        assert_eq!(result.message, "No job registered for job class 'Rotate'");
    }
}
