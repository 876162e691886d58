//! The outcome of one reconciliation.

use serde::Serialize;

use crate::types::Snapshot;

/// What happened, plus the value the store held before any change.
///
/// Serializes as `{"changed": .., "msg": .., "defaults": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Whether the store was (or in check mode would be) modified
    pub changed: bool,
    /// Human-readable summary
    #[serde(rename = "msg")]
    pub message: String,
    /// Value read before any change
    #[serde(rename = "defaults")]
    pub result: Snapshot,
}

impl Report {
    /// `"<key> set to <value>"`
    pub fn set(changed: bool, key: &str, value: &str, result: Snapshot) -> Self {
        Self {
            changed,
            message: format!("{key} set to {value}"),
            result,
        }
    }

    /// `"<key> removed"`
    pub fn removed(changed: bool, key: &str, result: Snapshot) -> Self {
        Self {
            changed,
            message: format!("{key} removed"),
            result,
        }
    }

    /// `"returning <key>"`; never a change.
    pub fn returning(key: Option<&str>, result: Snapshot) -> Self {
        Self {
            changed: false,
            message: format!("returning {}", key.unwrap_or("None")),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let snapshot = Snapshot::new(Some("KeyRepeat"), Some("2".to_string()));
        let report = Report::set(true, "KeyRepeat", "0", snapshot.clone());
        assert_eq!(report.message, "KeyRepeat set to 0");
        assert!(report.changed);
        assert_eq!(report.result, snapshot);

        assert_eq!(
            Report::removed(true, "foo", Snapshot::default()).message,
            "foo removed"
        );
        assert_eq!(
            Report::returning(Some("foo"), Snapshot::default()).message,
            "returning foo"
        );
        assert_eq!(
            Report::returning(None, Snapshot::default()).message,
            "returning None"
        );
    }

    #[test]
    fn test_serialized_shape() {
        let report = Report::returning(Some("foo"), Snapshot::new(Some("foo"), None));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "changed": false,
                "msg": "returning foo",
                "defaults": { "foo": null }
            })
        );
    }
}
