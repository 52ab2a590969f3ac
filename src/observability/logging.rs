//! # Structured Logging
//!
//! Logging setup and span macros built on the tracing ecosystem.

use crate::config::ObservabilityConfig;
use crate::errors::{AkvError, Result};
use tracing_subscriber::EnvFilter;

/// Create a tracing span covering one job invocation.
///
/// A random `invocation_id` is attached so that all log lines of one run can
/// be correlated; `job_id` is the host's identifier when one was supplied.
///
/// ```rust,ignore
/// let span = job_span!("Inventory", "AKV", config.job.job_id);
/// ```
#[macro_export]
macro_rules! job_span {
    ($job_class:expr, $store_type:expr, $job_id:expr) => {
        tracing::info_span!(
            "job",
            job_class = %$job_class,
            store_type = %$store_type,
            job_id = ?$job_id,
            invocation_id = %uuid::Uuid::new_v4()
        )
    };
}

/// Create a tracing span for one outbound Azure call.
#[macro_export]
macro_rules! azure_span {
    ($operation:expr) => {
        tracing::debug_span!("azure_call", operation = %$operation)
    };
    ($operation:expr, $($field:tt)*) => {
        tracing::debug_span!("azure_call", operation = %$operation, $($field)*)
    };
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Installing twice is
/// not an error; the second call leaves the existing subscriber in place.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::try_new(directives),
        Err(_) => EnvFilter::try_new(&config.log_level),
    }
    .map_err(|e| AkvError::config_with_source("Invalid log filter", e))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    // A subscriber may already be installed (e.g. by tests); keep it.
    let _ = if config.json_logging {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };
    Ok(())
}
