//! Output formatting for CLI runs
//!
//! Callback payloads and the final job result are printed to stdout as
//! pretty JSON, one document per event.

use crate::host::InventoryItem;
use anyhow::{Context, Result};
use serde::Serialize;

/// A host callback invocation, as printed by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "callback", content = "payload", rename_all = "snake_case")]
pub enum CallbackEvent {
    Inventory(Vec<InventoryItem>),
    Enrollment(String),
    Discovery(Vec<String>),
}

/// Serialize data as pretty JSON
pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
}

/// Print data as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", to_json(data)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_event_shape() {
        let event = CallbackEvent::Discovery(vec!["kv1".to_string()]);
        let json: serde_json::Value = serde_json::from_str(&to_json(&event).unwrap()).unwrap();
        assert_eq!(json["callback"], "discovery");
        assert_eq!(json["payload"][0], "kv1");
    }

    #[test]
    fn test_enrollment_event_shape() {
        let event = CallbackEvent::Enrollment("Y3Ny".to_string());
        let json: serde_json::Value = serde_json::from_str(&to_json(&event).unwrap()).unwrap();
        assert_eq!(json["callback"], "enrollment");
        assert_eq!(json["payload"], "Y3Ny");
    }
}
