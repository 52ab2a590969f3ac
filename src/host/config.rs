//! Job configuration handed over by the host for one invocation.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Management sub-operation requested by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    #[default]
    Unknown,
    Inventory,
    Add,
    Remove,
    Create,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Inventory => "Inventory",
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Create => "Create",
        }
    }
}

impl FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unknown" => Ok(Self::Unknown),
            "inventory" => Ok(Self::Inventory),
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "create" => Ok(Self::Create),
            _ => Err(format!("Unknown operation type: {}", s)),
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Certificate store the job targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreInfo {
    /// Store custom properties as a JSON object
    pub properties: String,
    /// Vault URL
    pub store_path: String,
}

/// Per-job request details
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobInfo {
    pub job_id: Option<Uuid>,
    pub operation_type: OperationType,
    pub alias: String,
    pub pfx_password: SecretString,
    /// Base64-encoded PFX for management adds
    pub entry_contents: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobConfigInfo {
    pub store: StoreInfo,
    pub job: JobInfo,
}

impl JobConfigInfo {
    pub fn new(properties: impl Into<String>, store_path: impl Into<String>) -> Self {
        Self {
            store: StoreInfo { properties: properties.into(), store_path: store_path.into() },
            job: JobInfo::default(),
        }
    }

    pub fn with_job_id(mut self, job_id: Uuid) -> Self {
        self.job.job_id = Some(job_id);
        self
    }

    pub fn with_operation(mut self, operation_type: OperationType) -> Self {
        self.job.operation_type = operation_type;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.job.alias = alias.into();
        self
    }

    /// Attach a PFX bundle (base64) and its password for a management add.
    pub fn with_entry(
        mut self,
        entry_contents: impl Into<String>,
        pfx_password: impl Into<SecretString>,
    ) -> Self {
        self.job.entry_contents = entry_contents.into();
        self.job.pfx_password = pfx_password.into();
        self
    }
}
