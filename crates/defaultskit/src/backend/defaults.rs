//! `defaults` CLI backend.
//!
//! Shells out to Apple's `defaults` utility, one process per call.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::types::CommandOutput;

use super::Backend;

/// Where macOS ships the utility.
const SYSTEM_DEFAULTS: &str = "/usr/bin/defaults";

/// Backend implementation using the `defaults` executable.
#[derive(Debug, Clone)]
pub struct DefaultsBackend {
    defaults_path: PathBuf,
}

impl DefaultsBackend {
    /// Locate `defaults` on this host.
    ///
    /// Returns [`Error::ToolUnavailable`] if it cannot be found.
    pub fn new() -> Result<Self> {
        let defaults_path = find_defaults()?;
        log::debug!("Using defaults at {}", defaults_path.display());
        Ok(Self { defaults_path })
    }

    /// Use an explicit executable path.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let defaults_path = path.into();
        if !defaults_path.is_file() {
            return Err(Error::ToolUnavailable {
                tool: defaults_path.display().to_string(),
            });
        }
        Ok(Self { defaults_path })
    }

    /// Path of the executable this backend runs.
    pub fn path(&self) -> &Path {
        &self.defaults_path
    }
}

impl Backend for DefaultsBackend {
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(&self.defaults_path)
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ToolUnavailable {
                        tool: self.defaults_path.display().to_string(),
                    }
                } else {
                    Error::Io(e)
                }
            })?;
        Ok(output.into())
    }
}

fn find_defaults() -> Result<PathBuf> {
    let system = Path::new(SYSTEM_DEFAULTS);
    if system.is_file() {
        return Ok(system.to_path_buf());
    }

    // Try which
    let output = Command::new("which")
        .arg("defaults")
        .output()
        .map_err(|_| Error::ToolUnavailable {
            tool: "defaults".to_string(),
        })?;

    if output.status.success() {
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    Err(Error::ToolUnavailable {
        tool: "defaults".to_string(),
    })
}
