//! Data exchanged with the remote service.

use serde::{Deserialize, Serialize};

/// An entity discovered for a credential, on whose behalf actions are performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTarget {
    pub id: String,
    /// Human-readable label shown in event logs.
    #[serde(rename = "name", default)]
    pub label: String,
    /// Derived credential needed to act for this sub-target.
    #[serde(rename = "access_token", default, skip_serializing_if = "Option::is_none")]
    pub sub_credential: Option<String>,
}

impl SubTarget {
    pub fn new(id: &str, label: &str, sub_credential: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            sub_credential: sub_credential.map(String::from),
        }
    }

    /// The sub-credential, if present and non-blank.
    pub fn usable_credential(&self) -> Option<&str> {
        self.sub_credential
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }
}

/// Result of one remote action: `Ok(())` or the diagnostic text returned by the remote.
pub type ActionOutcome = std::result::Result<(), String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_remote_shape() {
        let json = r#"{"id":"t1","name":"Page1","access_token":"tok1"}"#;
        let t: SubTarget = serde_json::from_str(json).unwrap();
        assert_eq!(t, SubTarget::new("t1", "Page1", Some("tok1")));
    }

    #[test]
    fn test_missing_credential_is_unusable() {
        let json = r#"{"id":"t2","name":"Page2"}"#;
        let t: SubTarget = serde_json::from_str(json).unwrap();
        assert!(t.usable_credential().is_none());
        assert!(SubTarget::new("t3", "x", Some("  ")).usable_credential().is_none());
        assert_eq!(SubTarget::new("t4", "x", Some("k")).usable_credential(), Some("k"));
    }
}
