//! Job classes understood by the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store type every job in this crate reports.
pub const STORE_TYPE: &str = "AKV";

/// Kind of job the host can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobKind {
    /// Create the configured vault
    Create,
    /// List vaults in the subscription
    Discovery,
    /// Report the certificates stored in the vault
    Inventory,
    /// Create a vault, add a certificate, or remove a certificate
    Management,
    /// Generate a CSR for a new version of an existing certificate
    #[serde(rename = "Enrollment")]
    Reenrollment,
}

impl JobKind {
    pub const ALL: [JobKind; 5] = [
        JobKind::Create,
        JobKind::Discovery,
        JobKind::Inventory,
        JobKind::Management,
        JobKind::Reenrollment,
    ];

    /// Host job class string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Discovery => "Discovery",
            Self::Inventory => "Inventory",
            Self::Management => "Management",
            Self::Reenrollment => "Enrollment",
        }
    }
}

impl FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Create" => Ok(Self::Create),
            "Discovery" => Ok(Self::Discovery),
            "Inventory" => Ok(Self::Inventory),
            "Management" => Ok(Self::Management),
            "Enrollment" | "Reenrollment" => Ok(Self::Reenrollment),
            _ => Err(format!("Unknown job class: {}", s)),
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_kind_roundtrip() {
        for kind in JobKind::ALL {
            let parsed: JobKind = kind.as_str().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_enrollment_is_reenrollment() {
        assert_eq!(JobKind::Reenrollment.as_str(), "Enrollment");
        assert_eq!("Enrollment".parse::<JobKind>().unwrap(), JobKind::Reenrollment);
        assert!("enrollment".parse::<JobKind>().is_err());
    }

    #[test]
    fn test_job_kind_serialization() {
        let json = serde_json::to_string(&JobKind::Reenrollment).unwrap();
        assert_eq!(json, "\"Enrollment\"");

        let parsed: JobKind = serde_json::from_str("\"Discovery\"").unwrap();
        assert_eq!(parsed, JobKind::Discovery);
    }
}
