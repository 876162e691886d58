//! Optional user configuration.
//!
//! Looked up in this order:
//! 1. `--config <file>`
//! 2. `$OSX_DEFAULTS_CONFIG_DIR/config.toml`
//! 3. `~/.config/osx-defaults/config.toml`
//!
//! A missing file at 2 or 3 means built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "OSX_DEFAULTS_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Location of the `defaults` executable; `~` is expanded
    pub defaults_path: Option<String>,
    /// How reports are printed when `--json` is not given
    pub output: OutputFormat,
    /// Always run in check mode
    pub check_mode: bool,
}

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!("Using config dir from {}: {}", ENV_CONFIG_DIR, path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("osx-defaults"))
}

impl Config {
    /// Load the config, from `explicit` if given (it must exist).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        let path = config_dir()?.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_file(&path)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Configured `defaults` executable, with `~` and env vars expanded.
    pub fn defaults_path(&self) -> Option<PathBuf> {
        self.defaults_path.as_deref().map(expand)
    }
}

fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;

    /// Run `f` with `key` set to `value` (or removed when `None`), restoring
    /// the previous value afterwards. Only one test touches the variable.
    #[allow(unsafe_code)]
    fn with_env_var<F, R>(key: &str, value: Option<&str>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: no other test reads this variable
        match value {
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        let result = f();
        match original {
            // SAFETY: as above
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output, OutputFormat::Human);
        assert!(!config.check_mode);
        assert_eq!(config.defaults_path(), None);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            defaults_path = "/usr/bin/defaults"
            output = "json"
            check_mode = true
            "#,
        )
        .unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert!(config.check_mode);
        assert_eq!(config.defaults_path(), Some(PathBuf::from("/usr/bin/defaults")));
    }

    #[test]
    fn test_tilde_expansion() {
        let config = Config::from_toml(r#"defaults_path = "~/bin/defaults""#).unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(config.defaults_path(), Some(home.join("bin/defaults")));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(Config::from_toml("colour = \"red\"").is_err());
        assert!(Config::from_toml("output = \"xml\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "check_mode = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.check_mode);

        assert!(Config::load(Some(Path::new("/nonexistent/config.toml"))).is_err());
    }

    #[test]
    fn test_config_dir_lookup() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "output = \"json\"\n").unwrap();
        let dir_str = dir.path().to_str().unwrap();

        with_env_var(ENV_CONFIG_DIR, Some(dir_str), || {
            assert_eq!(config_dir().unwrap(), dir.path());
            let config = Config::load(None).unwrap();
            assert_eq!(config.output, OutputFormat::Json);
        });

        with_env_var(ENV_CONFIG_DIR, None, || {
            let home = dirs::home_dir().unwrap();
            assert_eq!(config_dir().unwrap(), home.join(".config").join("osx-defaults"));
        });
    }
}
