//! Backend abstraction over the preference store executable.
//!
//! The [`Backend`] trait runs exactly one store invocation per call and hands
//! back its raw output. Interpretation of that output (trimming, treating
//! failures as "absent") lives in [`Store`](crate::store::Store).
//!
//! # Testing
//!
//! Use [`MockBackend`] to exercise the reconciler without touching the real
//! `defaults` database:
//!
//! ```
//! use defaultskit::backend::{Backend, MockBackend};
//!
//! let mock = MockBackend::new().with_value("NSGlobalDomain", "KeyRepeat", "2");
//! let out = mock.run(&["read", "NSGlobalDomain", "KeyRepeat"]).unwrap();
//! assert_eq!(out.stdout_str(), "2\n");
//! ```

#[cfg(feature = "defaults-cli")]
pub mod defaults;

use crate::error::{Error, Result};
use crate::types::CommandOutput;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Backend trait for preference store invocations.
///
/// This trait abstracts the underlying implementation, allowing us to:
/// - Shell out to `/usr/bin/defaults`
/// - Mock for testing
pub trait Backend: Send + Sync {
    /// Run the store with the given arguments (e.g. `["read", domain, key]`).
    ///
    /// A non-zero exit is NOT an error at this level; only failing to spawn
    /// the executable is.
    fn run(&self, args: &[&str]) -> Result<CommandOutput>;
}

type Table = BTreeMap<String, BTreeMap<String, String>>;

/// In-memory backend that mimics the `defaults` utility.
///
/// Values are stored the way the real store prints them back (booleans as
/// `1`/`0`). Every invocation is recorded. Clones share state, so a test can
/// keep one handle while the client owns another.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    table: Arc<Mutex<Table>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    unavailable: bool,
    read_only: bool,
}

impl MockBackend {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose executable "cannot be found".
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// A backend whose `write` invocations exit non-zero without storing
    /// anything, like a write to a domain the user cannot modify.
    #[must_use]
    pub fn with_failing_writes(self) -> Self {
        Self {
            read_only: true,
            ..self
        }
    }

    /// Seed a value, as the store would print it.
    #[must_use]
    pub fn with_value(self, domain: &str, key: &str, value: &str) -> Self {
        self.set(domain, key, value);
        self
    }

    /// Set a value directly, bypassing the call log.
    pub fn set(&self, domain: &str, key: &str, value: &str) {
        let mut table = self.table.lock().unwrap();
        table
            .entry(domain.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Current stored value for a key.
    pub fn get(&self, domain: &str, key: &str) -> Option<String> {
        let table = self.table.lock().unwrap();
        table.get(domain).and_then(|keys| keys.get(key)).cloned()
    }

    /// All recorded invocations, oldest first.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded `write`/`delete` invocations.
    pub fn mutations(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c.first().map(String::as_str), Some("write" | "delete")))
            .collect()
    }

    fn read(table: &Table, domain: &str, key: Option<&str>) -> CommandOutput {
        let Some(keys) = table.get(domain) else {
            return CommandOutput::failed(format!("Domain {domain} does not exist\n"));
        };

        match key {
            Some(key) => match keys.get(key) {
                Some(value) => CommandOutput::ok(format!("{value}\n")),
                None => CommandOutput::failed(format!(
                    "The domain/default pair of ({domain}, {key}) does not exist\n"
                )),
            },
            None => {
                let mut dump = String::from("{\n");
                for (k, v) in keys {
                    dump.push_str(&format!("    {k} = {v};\n"));
                }
                dump.push_str("}\n");
                CommandOutput::ok(dump)
            }
        }
    }

    fn write(
        table: &mut Table,
        domain: &str,
        key: &str,
        flag: &str,
        value: &str,
    ) -> CommandOutput {
        let stored = match flag {
            "-bool" | "-boolean" => match value {
                "true" | "yes" | "YES" | "1" => "1".to_string(),
                _ => "0".to_string(),
            },
            _ => value.to_string(),
        };
        table
            .entry(domain.to_string())
            .or_default()
            .insert(key.to_string(), stored);
        CommandOutput::ok("")
    }

    fn delete(table: &mut Table, domain: &str, key: Option<&str>) -> CommandOutput {
        match key {
            Some(key) => {
                let removed = table.get_mut(domain).and_then(|keys| keys.remove(key));
                if removed.is_some() {
                    CommandOutput::ok("")
                } else {
                    CommandOutput::failed(format!(
                        "Domain ({domain}) not found.\nDefaults have not been changed.\n"
                    ))
                }
            }
            None => match table.remove(domain) {
                Some(_) => CommandOutput::ok(""),
                None => CommandOutput::failed(format!(
                    "Domain ({domain}) not found.\nDefaults have not been changed.\n"
                )),
            },
        }
    }
}

impl Backend for MockBackend {
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        if self.unavailable {
            return Err(Error::ToolUnavailable {
                tool: "defaults".to_string(),
            });
        }

        self.calls
            .lock()
            .unwrap()
            .push(args.iter().map(|a| (*a).to_string()).collect());

        let mut table = self.table.lock().unwrap();
        let output = match args {
            ["read", domain] => Self::read(&table, domain, None),
            ["read", domain, key] => Self::read(&table, domain, Some(*key)),
            ["write", domain, ..] if self.read_only => {
                CommandOutput::failed(format!("Could not write domain {domain}; exiting\n"))
            }
            ["write", domain, key, flag, value] => {
                Self::write(&mut table, domain, key, flag, value)
            }
            ["delete", domain] => Self::delete(&mut table, domain, None),
            ["delete", domain, key] => Self::delete(&mut table, domain, Some(*key)),
            _ => CommandOutput::failed(format!("unexpected arguments: {}\n", args.join(" "))),
        };

        Ok(output)
    }
}
