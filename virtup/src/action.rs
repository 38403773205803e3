//! Planned host mutations as data.
//!
//! Steps never touch the host directly; they emit [`Action`] values and an
//! [`crate::exec::Executor`] applies them. Keeping actions as plain data is
//! what makes `--dry-run` and the planning tests possible.

use crate::host::pkg::PackageManager;
use serde::Serialize;
use std::path::PathBuf;

/// A user or service account the filesystem ownership is set to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub user: String,
    /// `None` means the user's login group (`chown user:` semantics).
    pub group: Option<String>,
}

impl Owner {
    pub fn service(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: Some(group.into()),
        }
    }

    pub fn login(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: None,
        }
    }

    /// `user:group` (or `user:`) as chown expects it.
    pub fn spec(&self) -> String {
        match &self.group {
            Some(group) => format!("{}:{}", self.user, group),
            None => format!("{}:", self.user),
        }
    }
}

/// One externally observable host mutation (or report).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Install system packages through the detected package manager.
    InstallPackages {
        manager: PackageManager,
        packages: Vec<String>,
    },

    /// Enable and start the libvirt daemon, preferring the service unit
    /// over the socket unit. The choice happens at apply time because the
    /// unit files only exist once the install has landed.
    EnableVirtDaemon,

    /// Add the user to a supplementary group.
    AddUserToGroup { user: String, group: String },

    /// `mkdir -p` as the invoking user.
    CreateDirAll { path: PathBuf },

    /// `mkdir -p` with elevated privilege (target's parent may not be
    /// writable by the invoking user yet).
    CreateDirPrivileged { path: PathBuf },

    /// Write the one-time configuration file. Refuses to touch an existing
    /// file even if planning raced with another writer.
    WriteConfigOnce { path: PathBuf, contents: String },

    /// Privileged chown.
    Chown {
        path: PathBuf,
        owner: Owner,
        recursive: bool,
    },

    /// Privileged chmod with absolute mode bits.
    Chmod { path: PathBuf, mode: u32 },

    /// Grant other-execute so the service account can traverse an ancestor
    /// directory (`chmod o+x`).
    GrantTraversal { path: PathBuf },

    /// Install an application into its own pipx environment.
    PipxInstall { package: String },

    /// Inject a library into an existing pipx environment. Best-effort:
    /// failure is logged and the run continues.
    PipxInject { package: String, dependency: String },

    /// Print owner/group/mode for each path so the operator can verify the
    /// traversal chain.
    ReportPermissions { paths: Vec<PathBuf> },
}

impl Action {
    /// Whether applying this action changes the host (reports do not).
    pub fn mutates(&self) -> bool {
        !matches!(self, Action::ReportPermissions { .. })
    }
}
