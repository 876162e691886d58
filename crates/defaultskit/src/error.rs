use thiserror::Error;

/// Errors that can occur while reconciling a default.
///
/// A key or domain that does not exist is never an error: the store reports
/// it as `None` inside the resulting [`Snapshot`](crate::Snapshot).
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid invocation: missing domain, unknown state, unknown type tag, ...
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The preference store executable could not be located
    #[error("{tool} not found - this crate requires the macOS defaults utility")]
    ToolUnavailable {
        /// Name or path of the executable that was looked up
        tool: String,
    },

    /// IO error while spawning the store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns true if the invocation itself was invalid (no command was run)
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true if the store executable is missing on this host
    pub fn is_tool_unavailable(&self) -> bool {
        matches!(self, Self::ToolUnavailable { .. })
    }
}

/// Result type for defaults operations
pub type Result<T> = std::result::Result<T, Error>;
