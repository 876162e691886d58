use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::process::Output;
use std::str::FromStr;

use crate::error::Error;

/// A preference domain, e.g. `com.apple.finder` or `NSGlobalDomain`.
///
/// Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    /// Create a domain, rejecting empty or whitespace-only names.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::config("domain is required"));
        }
        Ok(Self(name))
    }

    /// The domain name as passed to the store.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Value types understood by `defaults write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Text (`-string`)
    String,
    /// Integer (`-int`)
    Int,
    /// Floating point (`-float`)
    Float,
    /// Boolean, stored as `1`/`0` (`-bool`)
    Bool,
    /// Date (`-date`)
    Date,
    /// Hex-encoded bytes (`-data`)
    Data,
}

impl TypeTag {
    /// The type flag passed to `defaults write` (e.g. `-int`).
    pub fn flag(&self) -> &'static str {
        match self {
            Self::String => "-string",
            Self::Int => "-int",
            Self::Float => "-float",
            Self::Bool => "-bool",
            Self::Date => "-date",
            Self::Data => "-data",
        }
    }

    /// Canonical tag name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "string" => Ok(Self::String),
            "int" | "integer" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Bool),
            "date" => Ok(Self::Date),
            "data" => Ok(Self::Data),
            other => Err(Error::config(format!("unsupported type: {other}"))),
        }
    }
}

/// What the caller wants the key to look like after the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DesiredState {
    /// Only read the current value
    #[default]
    Read,
    /// Key must hold the given value
    Present,
    /// Key must not exist
    Absent,
    /// Reserved read mode, currently behaves like `Read`
    All,
    /// Reserved read mode, currently behaves like `Read`
    Keys,
}

impl DesiredState {
    /// All accepted state names, in the order they are documented.
    pub const NAMES: [&'static str; 5] = ["read", "present", "absent", "all", "keys"];

    /// Returns true for the non-mutating states.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Read | Self::All | Self::Keys)
    }

    /// Name as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Present => "present",
            Self::Absent => "absent",
            Self::All => "all",
            Self::Keys => "keys",
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DesiredState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "all" => Ok(Self::All),
            "keys" => Ok(Self::Keys),
            other => Err(Error::config(format!(
                "state must be one of {}, got: {other}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

/// The value of one key (or a whole domain) as reported by the store.
///
/// Serializes as a single-entry map `{ key: value }`. A domain-wide read has
/// no key and serializes under `"null"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    key: Option<String>,
    value: Option<String>,
}

impl Snapshot {
    /// Snapshot of `key` (`None` for the whole domain) holding `value`.
    pub fn new(key: Option<&str>, value: Option<String>) -> Self {
        Self {
            key: key.map(str::to_string),
            value,
        }
    }

    /// The key this snapshot was taken for.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The stored value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns true if the store holds a value for this key.
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key.as_deref().unwrap_or("null"), &self.value)?;
        map.end()
    }
}

/// A single reconciliation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Domain holding the key
    pub domain: Domain,
    /// Key to manage; `None` addresses the whole domain
    pub key: Option<String>,
    /// Desired value; setting one selects `present`
    pub value: Option<String>,
    /// Explicit value type, otherwise inferred from the value
    pub type_hint: Option<TypeTag>,
    /// Requested state
    pub state: DesiredState,
}

impl Request {
    /// Create a `read` request for the whole domain.
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            key: None,
            value: None,
            type_hint: None,
            state: DesiredState::Read,
        }
    }

    /// Set the key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the desired value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set an explicit value type.
    pub fn type_hint(mut self, type_hint: TypeTag) -> Self {
        self.type_hint = Some(type_hint);
        self
    }

    /// Set the requested state.
    pub fn state(mut self, state: DesiredState) -> Self {
        self.state = state;
        self
    }

    /// The state that actually runs: supplying a value always means `present`.
    pub fn effective_state(&self) -> DesiredState {
        if self.value.is_some() {
            DesiredState::Present
        } else {
            self.state
        }
    }
}

/// Captured output of one store invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Raw standard output
    pub stdout: Vec<u8>,
    /// Raw standard error
    pub stderr: Vec<u8>,
    /// Whether the process exited zero
    pub success: bool,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: output.stdout,
            stderr: output.stderr,
            success: output.status.success(),
        }
    }
}

impl CommandOutput {
    /// A successful invocation printing `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into().into_bytes(),
            stderr: Vec::new(),
            success: true,
        }
    }

    /// A failed invocation printing `stderr`.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: stderr.into().into_bytes(),
            success: false,
        }
    }

    /// Get stdout as a string
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a string
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}
