//! Host callbacks and the inventory item shape they carry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-side status of an inventoried certificate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryItemStatus {
    #[default]
    Unknown,
    New,
    Modified,
    Deleted,
}

/// One certificate reported to the host by an inventory job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Base64-encoded DER certificates, leaf first
    pub certificates: Vec<String>,
    pub alias: String,
    pub private_key_entry: bool,
    pub item_status: InventoryItemStatus,
    pub use_chain_level: bool,
}

impl InventoryItem {
    /// Key Vault certificates always carry their private key.
    pub fn from_vault(alias: impl Into<String>, certificate_b64: String) -> Self {
        Self {
            certificates: vec![certificate_b64],
            alias: alias.into(),
            private_key_entry: true,
            item_status: InventoryItemStatus::Unknown,
            use_chain_level: true,
        }
    }
}

pub type InventoryCallback = Box<dyn Fn(Vec<InventoryItem>) + Send + Sync>;
pub type EnrollmentCallback = Box<dyn Fn(String) + Send + Sync>;
pub type DiscoveryCallback = Box<dyn Fn(Vec<String>) + Send + Sync>;

/// The three delegates a job may report through. Each job invokes at most
/// one of them, at most once.
pub struct JobCallbacks {
    pub inventory: InventoryCallback,
    /// Receives a base64-encoded CSR
    pub enrollment: EnrollmentCallback,
    /// Receives vault names
    pub discovery: DiscoveryCallback,
}

impl Default for JobCallbacks {
    fn default() -> Self {
        Self {
            inventory: Box::new(|_| {}),
            enrollment: Box::new(|_| {}),
            discovery: Box::new(|_| {}),
        }
    }
}

impl JobCallbacks {
    pub fn on_inventory<F>(mut self, callback: F) -> Self
    where
        F: Fn(Vec<InventoryItem>) + Send + Sync + 'static,
    {
        self.inventory = Box::new(callback);
        self
    }

    pub fn on_enrollment<F>(mut self, callback: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.enrollment = Box::new(callback);
        self
    }

    pub fn on_discovery<F>(mut self, callback: F) -> Self
    where
        F: Fn(Vec<String>) + Send + Sync + 'static,
    {
        self.discovery = Box::new(callback);
        self
    }

    pub fn submit_inventory(&self, items: Vec<InventoryItem>) {
        (self.inventory)(items)
    }

    pub fn submit_enrollment(&self, csr_b64: String) {
        (self.enrollment)(csr_b64)
    }

    pub fn submit_discovery(&self, names: Vec<String>) {
        (self.discovery)(names)
    }
}

impl fmt::Debug for JobCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobCallbacks").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_inventory_item_from_vault() {
        let item = InventoryItem::from_vault("web", "MIIB".to_string());
        assert_eq!(item.certificates, vec!["MIIB"]);
        assert!(item.private_key_entry);
        assert!(item.use_chain_level);
        assert_eq!(item.item_status, InventoryItemStatus::Unknown);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["privateKeyEntry"], true);
        assert_eq!(json["itemStatus"], "Unknown");
    }

    #[test]
    fn test_default_callbacks_are_noops() {
        let callbacks = JobCallbacks::default();
        callbacks.submit_inventory(Vec::new());
        callbacks.submit_enrollment(String::new());
        callbacks.submit_discovery(Vec::new());
    }

    #[test]
    fn test_discovery_callback_receives_names() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callbacks = JobCallbacks::default()
            .on_discovery(move |names| sink.lock().unwrap().extend(names));

        callbacks.submit_discovery(vec!["kv1".to_string(), "kv2".to_string()]);
        assert_eq!(*seen.lock().unwrap(), vec!["kv1", "kv2"]);
    }
}
