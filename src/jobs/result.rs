//! Job completion records and the reporter that builds them.

use super::kind::{JobKind, STORE_TYPE};
use crate::errors::flatten_error_chain;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use tracing::{error, info};

/// Completion status, encoded with the host's numeric values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum JobStatus {
    Success,
    Failure,
}

impl JobStatus {
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 2,
            Self::Failure => 4,
        }
    }
}

impl From<JobStatus> for i32 {
    fn from(status: JobStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for JobStatus {
    type Error = String;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        match code {
            2 => Ok(Self::Success),
            4 => Ok(Self::Failure),
            _ => Err(format!("Unknown job status code: {}", code)),
        }
    }
}

/// What a job hands back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub status: JobStatus,
    pub message: String,
}

impl JobResult {
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Success
    }
}

/// Converts job outcomes into [`JobResult`]s and logs failures.
pub struct Reporter;

impl Reporter {
    /// Success with `message`, or `"{JobClass} Complete"` when none is given.
    pub fn success(kind: JobKind, message: Option<String>) -> JobResult {
        let message = message.unwrap_or_else(|| format!("{} Complete", kind.as_str()));
        info!(job_class = %kind, store_type = STORE_TYPE, message = %message, "Job succeeded");
        JobResult { status: JobStatus::Success, message }
    }

    /// Failure carrying the flattened error chain.
    pub fn failure(kind: JobKind, err: &(dyn StdError + 'static), stage: &str) -> JobResult {
        let message = flatten_error_chain(err);
        error!(
            job_class = %kind,
            store_type = STORE_TYPE,
            stage = stage,
            "Error performing {} in {} {} - {}",
            stage,
            kind,
            STORE_TYPE,
            message
        );
        JobResult { status: JobStatus::Failure, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AkvError;
    use tracing_test::traced_test;

    #[test]
    fn test_status_serializes_as_host_codes() {
        assert_eq!(serde_json::to_string(&JobStatus::Success).unwrap(), "2");
        assert_eq!(serde_json::to_string(&JobStatus::Failure).unwrap(), "4");
        assert_eq!(serde_json::from_str::<JobStatus>("4").unwrap(), JobStatus::Failure);
        assert!(serde_json::from_str::<JobStatus>("3").is_err());
    }

    #[test]
    fn test_result_json_shape() {
        let result = Reporter::success(JobKind::Inventory, None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], 2);
        assert_eq!(json["message"], "Inventory Complete");
    }

    #[test]
    fn test_default_success_message_uses_job_class() {
        assert_eq!(Reporter::success(JobKind::Reenrollment, None).message, "Enrollment Complete");
        assert_eq!(
            Reporter::success(JobKind::Create, Some("done".to_string())).message,
            "done"
        );
    }

    #[traced_test]
    #[test]
    fn test_failure_flattens_and_logs() {
        let err = AkvError::context("A", AkvError::context("B", AkvError::validation("C")));
        let result = Reporter::failure(JobKind::Discovery, &err, "List Vaults");

        assert_eq!(result.status, JobStatus::Failure);
        assert_eq!(result.message, "A - B - C");
        assert!(logs_contain("Error performing List Vaults in Discovery AKV - A - B - C"));
    }
}
