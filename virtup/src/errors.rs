//! Error types for host provisioning.
//!
//! Errors are categorized by how the caller should react:
//! - [`VirtupError::UnsupportedHost`]: the machine cannot be provisioned
//!   (no recognized package manager, no pipx path) — fatal, exit non-zero.
//! - [`VirtupError::Command`]: an external command failed — fatal unless the
//!   action is explicitly best-effort.
//! - [`VirtupError::Probe`]: host observation failed (identity, ownership).
//!
//! The re-login pause is NOT an error; it is a [`crate::sequencer::RunOutcome`].

use std::io;
use thiserror::Error;

/// Errors that can occur while probing or provisioning the host.
#[derive(Debug, Error)]
pub enum VirtupError {
    /// The host lacks something provisioning cannot supply.
    #[error("unsupported host: {0}")]
    UnsupportedHost(String),

    /// An external command exited unsuccessfully.
    #[error("command `{command}` failed: {detail}")]
    Command { command: String, detail: String },

    /// Read-only host observation failed.
    #[error("probe: {0}")]
    Probe(String),

    /// Generic IO error (catch-all for filesystem operations).
    #[error("io: {0}")]
    Io(#[from] io::Error),

    /// Catalog fetch failed.
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
}

impl VirtupError {
    /// Build a [`VirtupError::Command`] from an argv and a failure detail.
    pub fn command(argv: &[String], detail: impl Into<String>) -> Self {
        VirtupError::Command {
            command: argv.join(" "),
            detail: detail.into(),
        }
    }
}

pub type VirtupResult<T> = Result<T, VirtupError>;
