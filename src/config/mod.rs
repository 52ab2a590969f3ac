//! # Configuration Management
//!
//! Two layers of configuration:
//!
//! - [`AzureSettings`] and [`ObservabilityConfig`]: process-wide, loaded once
//!   from `AKV_*` environment variables (a `.env` file is honoured by the CLI).
//! - [`JobParameters`]: per invocation, parsed from the host's store
//!   properties and store path.

pub mod job_parameters;
pub mod secret;
pub mod settings;

pub use job_parameters::JobParameters;
pub use secret::SecretString;
pub use settings::{AzureSettings, ObservabilityConfig};
