//! # defaultskit
//!
//! Declarative management of a single macOS user default.
//!
//! Instead of issuing `defaults read`/`write`/`delete` by hand, callers state
//! what a key should look like and the [`Client`] works out whether anything
//! has to change:
//!
//! - **present**: the key must hold a value. Written only if it differs.
//! - **absent**: the key must not exist. Deleted only if it is set.
//! - **read**: just report the current value.
//!
//! Every run re-reads the store, so applying the same request twice reports
//! `changed = true` and then `changed = false`.
//!
//! ## Example
//!
//! ```no_run
//! use defaultskit::{Client, DesiredState, Domain, Request};
//!
//! let client = Client::new().expect("defaults not available");
//!
//! let request = Request::new(Domain::new("NSGlobalDomain")?)
//!     .key("KeyRepeat")
//!     .value("2")
//!     .state(DesiredState::Present);
//!
//! let report = client.apply(&request)?;
//! println!("{} (changed: {})", report.message, report.changed);
//! # Ok::<(), defaultskit::Error>(())
//! ```
//!
//! ## Value types
//!
//! Without an explicit [`TypeTag`], `true`/`false` are written as booleans,
//! anything containing a digit as an integer, and the rest as strings. When
//! comparing, `true`/`false` are considered equal to the `1`/`0` the store
//! prints for booleans.
//!
//! ## Check mode
//!
//! [`Client::check_mode`] computes and reports `changed` exactly as a real run
//! would, but never dispatches the write or delete.
//!
//! ## Errors
//!
//! Missing keys and failed store invocations are NOT errors; they show up as
//! `None` in the report. Only an invalid request ([`Error::Configuration`])
//! or a missing `defaults` executable ([`Error::ToolUnavailable`]) fail.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

/// Backend implementations for running the preference store.
pub mod backend;
/// Error types for defaults operations.
pub mod error;
/// Value type inference.
pub mod infer;
/// Desired-state reconciliation.
pub mod reconcile;
/// Reconciliation reports.
pub mod report;
/// Read/write/delete adapter over a backend.
pub mod store;
/// Domains, type tags, states and snapshots.
pub mod types;

pub use error::{Error, Result};
pub use infer::infer;
pub use reconcile::Reconciler;
pub use report::Report;
pub use store::Store;
pub use types::{CommandOutput, DesiredState, Domain, Request, Snapshot, TypeTag};

use backend::Backend;

/// High-level client: one [`Request`] in, one [`Report`] out.
pub struct Client {
    reconciler: Reconciler,
}

impl Client {
    /// Create a client that shells out to the system `defaults`.
    ///
    /// Returns [`Error::ToolUnavailable`] if the executable cannot be found.
    #[cfg(feature = "defaults-cli")]
    pub fn new() -> Result<Self> {
        let backend = backend::defaults::DefaultsBackend::new()?;
        Ok(Self::with_backend(Box::new(backend)))
    }

    /// Create a client running the `defaults` executable at `path`.
    #[cfg(feature = "defaults-cli")]
    pub fn from_path(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        let backend = backend::defaults::DefaultsBackend::from_path(path)?;
        log::debug!("Using defaults at {}", backend.path().display());
        Ok(Self::with_backend(Box::new(backend)))
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            reconciler: Reconciler::new(Store::new(backend)),
        }
    }

    /// Enable or disable check (simulate-only) mode.
    pub fn check_mode(self, enabled: bool) -> Self {
        Self {
            reconciler: self.reconciler.check_mode(enabled),
        }
    }

    /// Reconcile one key and report the outcome.
    pub fn apply(&self, request: &Request) -> Result<Report> {
        log::debug!(
            "Reconciling {} {} (state={}, check_mode={})",
            request.domain,
            request.key.as_deref().unwrap_or("<domain>"),
            request.effective_state(),
            self.reconciler.is_check_mode()
        );
        self.reconciler.reconcile(request)
    }
}
