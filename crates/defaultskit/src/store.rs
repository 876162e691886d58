//! Store adapter: read, write and delete against the preference store.
//!
//! Each operation spawns exactly one process and returns a [`Snapshot`] of
//! its trimmed output. A non-zero exit never fails the operation: the store
//! prints the same kind of error for "key does not exist" and "bad
//! arguments", so both collapse into `None`.

use crate::backend::Backend;
use crate::error::Result;
use crate::infer::infer;
use crate::types::{CommandOutput, Domain, Snapshot, TypeTag};

/// Adapter over a [`Backend`].
pub struct Store {
    backend: Box<dyn Backend>,
}

impl Store {
    /// Create a store running commands through `backend`.
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Read the value of `key`, or the whole domain when `key` is `None`.
    pub fn read(&self, domain: &Domain, key: Option<&str>) -> Result<Snapshot> {
        let mut args = vec!["read", domain.as_str()];
        args.extend(key);
        let value = self.run(&args)?;
        Ok(Snapshot::new(key, value))
    }

    /// Write `value` under `key`, inferring the type when none is given.
    pub fn write(
        &self,
        domain: &Domain,
        key: &str,
        value: &str,
        type_hint: Option<TypeTag>,
    ) -> Result<Snapshot> {
        let type_tag = type_hint.unwrap_or_else(|| infer(value));
        log::debug!("Writing {domain} {key} as {type_tag}");

        let args = ["write", domain.as_str(), key, type_tag.flag(), value];
        let value = self.run(&args)?;
        Ok(Snapshot::new(Some(key), value))
    }

    /// Delete `key`, or the whole domain when `key` is `None`.
    pub fn delete(&self, domain: &Domain, key: Option<&str>) -> Result<Snapshot> {
        let mut args = vec!["delete", domain.as_str()];
        args.extend(key);
        let value = self.run(&args)?;
        Ok(Snapshot::new(key, value))
    }

    fn run(&self, args: &[&str]) -> Result<Option<String>> {
        log::debug!("defaults {}", args.join(" "));
        let output = self.backend.run(args)?;

        if !output.success {
            log_failure(args, &output);
            return Ok(None);
        }

        Ok(normalize(&output.stdout_str()))
    }
}

fn log_failure(args: &[&str], output: &CommandOutput) {
    let stderr = output.stderr_str();
    let stderr = stderr.trim();
    if args.first() == Some(&"write") {
        log::warn!("defaults {} failed: {stderr}", args.join(" "));
    } else {
        log::debug!("defaults {} exited non-zero: {stderr}", args.join(" "));
    }
}

/// Trim surrounding whitespace; empty output means no value.
fn normalize(stdout: &str) -> Option<String> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
