//! Reconciler: converge one key to its desired state.
//!
//! Every run reads the current value fresh, decides whether a write or delete
//! is needed, and reports the value as it was BEFORE any change. In check
//! mode the decision is made and reported but nothing is dispatched.

use crate::error::{Error, Result};
use crate::report::Report;
use crate::store::Store;
use crate::types::{DesiredState, Request};

/// Collapse boolean literals to the store's canonical `1`/`0` encoding.
pub fn normalize_bool(value: &str) -> &str {
    match value {
        "true" => "1",
        "false" => "0",
        other => other,
    }
}

/// Drives a [`Store`] towards the state named by a [`Request`].
pub struct Reconciler {
    store: Store,
    check_mode: bool,
}

impl Reconciler {
    /// Create a reconciler that applies changes through `store`.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            check_mode: false,
        }
    }

    /// Compute `changed` without dispatching writes or deletes.
    pub fn check_mode(mut self, enabled: bool) -> Self {
        self.check_mode = enabled;
        self
    }

    /// Returns true if writes and deletes are suppressed.
    pub fn is_check_mode(&self) -> bool {
        self.check_mode
    }

    /// Converge the key named by `request` and report the outcome.
    ///
    /// The report carries the value as read before any write or delete.
    pub fn reconcile(&self, request: &Request) -> Result<Report> {
        match request.effective_state() {
            state if state.is_read_only() => self.read(request),
            DesiredState::Present => self.present(request),
            _ => self.absent(request),
        }
    }

    fn present(&self, request: &Request) -> Result<Report> {
        if request.state == DesiredState::Absent {
            log::warn!("A value was given with state=absent; setting the key instead");
        }

        let key = require_key(request, DesiredState::Present)?;
        let value = request
            .value
            .as_deref()
            .ok_or_else(|| Error::config("state=present requires a value"))?;

        let current = self.store.read(&request.domain, Some(key))?;
        let changed = match current.value() {
            Some(current) => normalize_bool(current) != normalize_bool(value),
            None => true,
        };

        if changed {
            if self.check_mode {
                log::info!("Check mode: would set {} {key} to {value}", request.domain);
            } else {
                log::info!("Setting {} {key} to {value}", request.domain);
                self.store
                    .write(&request.domain, key, value, request.type_hint)?;
            }
        } else {
            log::debug!("{} {key} already set to {value}", request.domain);
        }

        Ok(Report::set(changed, key, value, current))
    }

    fn absent(&self, request: &Request) -> Result<Report> {
        let key = require_key(request, DesiredState::Absent)?;

        let current = self.store.read(&request.domain, Some(key))?;
        let changed = current.is_present();

        if changed {
            if self.check_mode {
                log::info!("Check mode: would remove {} {key}", request.domain);
            } else {
                log::info!("Removing {} {key}", request.domain);
                self.store.delete(&request.domain, Some(key))?;
            }
        } else {
            log::debug!("{} {key} already absent", request.domain);
        }

        Ok(Report::removed(changed, key, current))
    }

    fn read(&self, request: &Request) -> Result<Report> {
        let key = request.key.as_deref();
        let current = self.store.read(&request.domain, key)?;
        Ok(Report::returning(key, current))
    }
}

fn require_key(request: &Request, state: DesiredState) -> Result<&str> {
    request
        .key
        .as_deref()
        .ok_or_else(|| Error::config(format!("state={state} requires a key")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::types::{Domain, Snapshot, TypeTag};

    fn reconciler(mock: &MockBackend) -> Reconciler {
        Reconciler::new(Store::new(Box::new(mock.clone())))
    }

    fn request(domain: &str) -> Request {
        Request::new(Domain::new(domain).unwrap())
    }

    #[test]
    fn test_normalize_bool() {
        assert_eq!(normalize_bool("true"), "1");
        assert_eq!(normalize_bool("false"), "0");
        assert_eq!(normalize_bool("1"), "1");
        assert_eq!(normalize_bool("TRUE"), "TRUE");
    }

    #[test]
    fn test_present_writes_inferred_int() {
        let mock = MockBackend::new().with_value("NSGlobalDomain", "KeyRepeat", "2");
        let req = request("NSGlobalDomain")
            .key("KeyRepeat")
            .value("0")
            .state(DesiredState::Present);

        let report = reconciler(&mock).reconcile(&req).unwrap();
        assert!(report.changed);
        assert_eq!(report.message, "KeyRepeat set to 0");
        // Pre-change snapshot
        assert_eq!(report.result, Snapshot::new(Some("KeyRepeat"), Some("2".to_string())));
        assert_eq!(
            mock.mutations(),
            vec![vec!["write", "NSGlobalDomain", "KeyRepeat", "-int", "0"]]
        );
        assert_eq!(mock.get("NSGlobalDomain", "KeyRepeat"), Some("0".to_string()));
    }

    #[test]
    fn test_present_is_idempotent() {
        let mock = MockBackend::new();
        let req = request("NSGlobalDomain")
            .key("foo")
            .value("bar")
            .state(DesiredState::Present);
        let reconciler = reconciler(&mock);

        assert!(reconciler.reconcile(&req).unwrap().changed);
        let second = reconciler.reconcile(&req).unwrap();
        assert!(!second.changed);
        assert_eq!(second.result.value(), Some("bar"));
        assert_eq!(mock.mutations().len(), 1);
    }

    #[test]
    fn test_present_boolean_equivalence() {
        let mock = MockBackend::new().with_value(
            "com.apple.driver.AppleBluetoothMultitouch.trackpad",
            "Clicking",
            "1",
        );
        let req = request("com.apple.driver.AppleBluetoothMultitouch.trackpad")
            .key("Clicking")
            .value("true");

        let report = reconciler(&mock).reconcile(&req).unwrap();
        assert!(!report.changed);
        assert!(mock.mutations().is_empty());
    }

    #[test]
    fn test_value_without_state_means_present() {
        let mock = MockBackend::new();
        let req = request("com.apple.finder")
            .key("FXPreferredViewStyle")
            .value("Nlsv");

        let report = reconciler(&mock).reconcile(&req).unwrap();
        assert!(report.changed);
        assert_eq!(report.message, "FXPreferredViewStyle set to Nlsv");
        assert_eq!(
            mock.mutations(),
            vec![vec![
                "write",
                "com.apple.finder",
                "FXPreferredViewStyle",
                "-string",
                "Nlsv"
            ]]
        );
    }

    #[test]
    fn test_present_explicit_type() {
        let mock = MockBackend::new();
        let req = request("com.example")
            .key("Label")
            .value("true")
            .type_hint(TypeTag::String);

        reconciler(&mock).reconcile(&req).unwrap();
        assert_eq!(
            mock.mutations(),
            vec![vec!["write", "com.example", "Label", "-string", "true"]]
        );
    }

    #[test]
    fn test_present_reports_change_when_write_fails() {
        let mock = MockBackend::new()
            .with_value("com.example", "foo", "old")
            .with_failing_writes();
        let req = request("com.example").key("foo").value("new");

        let report = reconciler(&mock).reconcile(&req).unwrap();
        assert!(report.changed);
        assert_eq!(report.message, "foo set to new");
        assert_eq!(report.result.value(), Some("old"));
        assert_eq!(mock.mutations().len(), 1);
        assert_eq!(mock.get("com.example", "foo"), Some("old".to_string()));
    }

    #[test]
    fn test_present_check_mode_does_not_write() {
        let mock = MockBackend::new();
        let req = request("NSGlobalDomain").key("KeyRepeat").value("0");

        let report = reconciler(&mock).check_mode(true).reconcile(&req).unwrap();
        assert!(report.changed);
        assert!(mock.mutations().is_empty());
        assert_eq!(mock.get("NSGlobalDomain", "KeyRepeat"), None);
    }

    #[test]
    fn test_present_requires_key() {
        let mock = MockBackend::new();
        let req = request("NSGlobalDomain").value("0");

        let err = reconciler(&mock).reconcile(&req).unwrap_err();
        assert!(err.is_configuration());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_present_requires_value() {
        let mock = MockBackend::new();
        let req = request("NSGlobalDomain")
            .key("foo")
            .state(DesiredState::Present);

        let err = reconciler(&mock).reconcile(&req).unwrap_err();
        assert!(err.is_configuration());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_absent_deletes_existing() {
        let mock = MockBackend::new().with_value("NSGlobalDomain", "foo", "bar");
        let req = request("NSGlobalDomain")
            .key("foo")
            .state(DesiredState::Absent);

        let report = reconciler(&mock).reconcile(&req).unwrap();
        assert!(report.changed);
        assert_eq!(report.message, "foo removed");
        assert_eq!(report.result.value(), Some("bar"));
        assert_eq!(mock.mutations(), vec![vec!["delete", "NSGlobalDomain", "foo"]]);
        assert_eq!(mock.get("NSGlobalDomain", "foo"), None);
    }

    #[test]
    fn test_absent_on_missing_key_is_noop() {
        let mock = MockBackend::new();
        let req = request("NSGlobalDomain")
            .key("foo")
            .state(DesiredState::Absent);

        let report = reconciler(&mock).reconcile(&req).unwrap();
        assert!(!report.changed);
        assert!(mock.mutations().is_empty());
    }

    #[test]
    fn test_absent_check_mode_does_not_delete() {
        let mock = MockBackend::new().with_value("NSGlobalDomain", "foo", "bar");
        let req = request("NSGlobalDomain")
            .key("foo")
            .state(DesiredState::Absent);

        let report = reconciler(&mock).check_mode(true).reconcile(&req).unwrap();
        assert!(report.changed);
        assert!(mock.mutations().is_empty());
        assert_eq!(mock.get("NSGlobalDomain", "foo"), Some("bar".to_string()));
    }

    #[test]
    fn test_absent_requires_key() {
        let mock = MockBackend::new();
        let req = request("NSGlobalDomain").state(DesiredState::Absent);
        assert!(reconciler(&mock).reconcile(&req).unwrap_err().is_configuration());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_value_overrides_absent() {
        let mock = MockBackend::new();
        let req = request("NSGlobalDomain")
            .key("foo")
            .value("bar")
            .state(DesiredState::Absent);

        let report = reconciler(&mock).reconcile(&req).unwrap();
        assert_eq!(report.message, "foo set to bar");
        assert_eq!(mock.get("NSGlobalDomain", "foo"), Some("bar".to_string()));
    }

    #[test]
    fn test_read_missing_key() {
        let mock = MockBackend::new();
        let req = request("NSGlobalDomain").key("foo");

        let report = reconciler(&mock).reconcile(&req).unwrap();
        assert!(!report.changed);
        assert_eq!(report.message, "returning foo");
        assert_eq!(report.result, Snapshot::new(Some("foo"), None));
    }

    #[test]
    fn test_reserved_states_read() {
        let mock = MockBackend::new().with_value("com.example", "a", "1");
        for state in [DesiredState::All, DesiredState::Keys] {
            let report = reconciler(&mock)
                .reconcile(&request("com.example").state(state))
                .unwrap();
            assert!(!report.changed);
            assert_eq!(report.result.key(), None);
            assert!(report.result.is_present());
        }
        assert!(mock.mutations().is_empty());
    }

    #[test]
    fn test_missing_tool_is_fatal() {
        let req = request("NSGlobalDomain").key("foo");
        let reconciler = Reconciler::new(Store::new(Box::new(MockBackend::unavailable())));
        assert!(reconciler.reconcile(&req).unwrap_err().is_tool_unavailable());
    }
}
