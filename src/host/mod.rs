//! # Host Contract
//!
//! Types exchanged with the certificate-management platform that invokes the
//! jobs: the per-invocation [`JobConfigInfo`] and the [`JobCallbacks`] a job
//! reports through.

pub mod callbacks;
pub mod config;

pub use callbacks::{
    DiscoveryCallback, EnrollmentCallback, InventoryCallback, InventoryItem, InventoryItemStatus,
    JobCallbacks,
};
pub use config::{JobConfigInfo, JobInfo, OperationType, StoreInfo};
