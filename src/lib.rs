//! # AKV Orchestrator
//!
//! Certificate store jobs for Azure Key Vault. A certificate-management host
//! invokes one job at a time; each job authenticates with a service principal,
//! performs one vault or certificate operation, and reports back through a
//! status and, where relevant, a host callback.
//!
//! ## Architecture
//!
//! ```text
//! Host → JobRegistry → AgentJob → ClientFactory → KeyVaultApi → Azure REST
//!                          ↓                          ↓
//!                   Reporter / callbacks         TokenProvider
//! ```
//!
//! ## Core Components
//!
//! - **Jobs**: Create, Discovery, Inventory, Management, Reenrollment
//! - **Azure client**: Resource Manager and Key Vault data-plane calls over reqwest
//! - **Host contract**: job configuration, callbacks, and `JobResult`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use akv_orchestrator::{AzureClientFactory, AzureSettings, JobCallbacks, JobConfigInfo, JobKind, JobRegistry};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> akv_orchestrator::Result<()> {
//!     let factory = Arc::new(AzureClientFactory::new(AzureSettings::from_env()?));
//!     let registry = JobRegistry::with_defaults(factory);
//!     let config = JobConfigInfo::new(r#"{"TenantId": "..."}"#, "https://my-vault.vault.azure.net");
//!     let result = registry.process(JobKind::Inventory, &config, &JobCallbacks::default()).await;
//!     println!("{}", result.message);
//!     Ok(())
//! }
//! ```

pub mod azure;
pub mod cli;
pub mod config;
pub mod errors;
pub mod host;
pub mod jobs;
pub mod observability;

// Re-export commonly used types and traits
pub use azure::{AzureClientFactory, ClientFactory, KeyVaultApi};
pub use config::{AzureSettings, JobParameters, ObservabilityConfig};
pub use errors::{flatten_error_chain, AkvError, Result};
pub use host::{JobCallbacks, JobConfigInfo, OperationType};
pub use jobs::{AgentJob, JobKind, JobRegistry, JobResult, JobStatus, STORE_TYPE};
pub use observability::init_logging;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
