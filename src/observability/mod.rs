//! # Observability
//!
//! Structured logging for job invocations. Every job runs inside a
//! [`job_span!`](crate::job_span) so that its log lines carry the job class,
//! store type, and host job id.

pub mod logging;

pub use logging::init_logging;
