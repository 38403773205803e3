//! Host observation behind a trait so planning stays testable.
//!
//! Every provisioning decision is made from facts read through
//! [`HostProbe`]. [`LiveProbe`] answers from the real machine; tests use the
//! in-crate fake. Probing never mutates the host.

use crate::errors::{VirtupError, VirtupResult};
use crate::host::pkg::PackageManager;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Who is running the provisioner.
#[derive(Clone, Debug)]
pub struct Identity {
    pub user: String,
    pub home: PathBuf,
}

/// Ownership and permission bits of an existing path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathState {
    pub owner: String,
    pub group: String,
    /// Permission bits only (`st_mode & 0o7777`).
    pub mode: u32,
}

impl PathState {
    /// Whether "other" has execute (traverse) permission.
    pub fn other_can_traverse(&self) -> bool {
        self.mode & 0o001 != 0
    }
}

/// Read-only view of the host used by step planning.
pub trait HostProbe {
    /// Invoking user's name and home directory.
    fn identity(&self) -> VirtupResult<Identity>;

    /// Whether the running session's groups include `group`.
    ///
    /// Deliberately reads the process's supplementary groups rather than the
    /// group database: membership granted after login is invisible here,
    /// which is exactly the staleness the group gate must detect.
    fn member_of(&self, group: &str) -> VirtupResult<bool>;

    /// First supported system package manager found on PATH.
    fn package_manager(&self) -> Option<PackageManager>;

    /// Whether an executable with this name is on PATH.
    fn binary_on_path(&self, name: &str) -> bool;

    /// Whether a systemd unit file is registered.
    fn unit_registered(&self, unit: &str) -> bool;

    /// Ownership/mode of `path`, or `None` if it does not exist.
    fn path_state(&self, path: &Path) -> VirtupResult<Option<PathState>>;
}

/// [`HostProbe`] backed by the real machine.
#[derive(Debug, Default)]
pub struct LiveProbe;

impl LiveProbe {
    pub fn new() -> Self {
        Self
    }
}

impl HostProbe for LiveProbe {
    fn identity(&self) -> VirtupResult<Identity> {
        let uid = nix::unistd::getuid();
        let user = nix::unistd::User::from_uid(uid)
            .map_err(|e| VirtupError::Probe(format!("uid {} lookup failed: {}", uid, e)))?
            .ok_or_else(|| VirtupError::Probe(format!("uid {} has no passwd entry", uid)))?;

        // $HOME (via dirs) wins over the passwd entry so sudo-preserved or
        // overridden homes are respected.
        let home = dirs::home_dir().unwrap_or_else(|| user.dir.clone());

        Ok(Identity {
            user: user.name,
            home,
        })
    }

    fn member_of(&self, group: &str) -> VirtupResult<bool> {
        let wanted = match nix::unistd::Group::from_name(group)
            .map_err(|e| VirtupError::Probe(format!("group {} lookup failed: {}", group, e)))?
        {
            Some(g) => g.gid,
            None => return Ok(false),
        };

        if nix::unistd::getgid() == wanted {
            return Ok(true);
        }

        let session_groups = nix::unistd::getgroups()
            .map_err(|e| VirtupError::Probe(format!("getgroups failed: {}", e)))?;
        Ok(session_groups.contains(&wanted))
    }

    fn package_manager(&self) -> Option<PackageManager> {
        [PackageManager::Dnf, PackageManager::AptGet]
            .into_iter()
            .find(|mgr| self.binary_on_path(mgr.binary()))
    }

    fn binary_on_path(&self, name: &str) -> bool {
        let Some(path_var) = std::env::var_os("PATH") else {
            return false;
        };
        std::env::split_paths(&path_var).any(|dir| is_executable(&dir.join(name)))
    }

    fn unit_registered(&self, unit: &str) -> bool {
        // Exit status alone is not enough across systemd versions; require
        // the unit to actually be listed.
        Command::new("systemctl")
            .args(["list-unit-files", "--no-legend", unit])
            .output()
            .map(|out| out.status.success() && !out.stdout.is_empty())
            .unwrap_or(false)
    }

    fn path_state(&self, path: &Path) -> VirtupResult<Option<PathState>> {
        use std::os::unix::fs::MetadataExt;

        let meta = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(VirtupError::Probe(format!(
                    "stat {} failed: {}",
                    path.display(),
                    e
                )));
            }
        };

        Ok(Some(PathState {
            owner: user_name(meta.uid()),
            group: group_name(meta.gid()),
            mode: meta.mode() & 0o7777,
        }))
    }
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.mode() & 0o111 != 0)
        .unwrap_or(false)
}

fn user_name(uid: u32) -> String {
    nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid))
        .ok()
        .flatten()
        .map(|u| u.name)
        .unwrap_or_else(|| uid.to_string())
}

fn group_name(gid: u32) -> String {
    nix::unistd::Group::from_gid(nix::unistd::Gid::from_raw(gid))
        .ok()
        .flatten()
        .map(|g| g.name)
        .unwrap_or_else(|| gid.to_string())
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scriptable probe for planning tests.

    use super::*;
    use std::collections::HashMap;

    pub struct FakeProbe {
        pub identity: Identity,
        pub groups: Vec<String>,
        pub manager: Option<PackageManager>,
        pub binaries: Vec<String>,
        pub units: Vec<String>,
        pub paths: HashMap<PathBuf, PathState>,
    }

    impl FakeProbe {
        /// A host with nothing provisioned: dnf present, no libvirt, no pipx.
        pub fn bare() -> Self {
            Self {
                identity: Identity {
                    user: "alice".to_string(),
                    home: PathBuf::from("/home/alice"),
                },
                groups: vec!["alice".to_string()],
                manager: Some(PackageManager::Dnf),
                binaries: vec!["dnf".to_string()],
                units: Vec::new(),
                paths: HashMap::new(),
            }
        }

        pub fn with_binary(mut self, name: &str) -> Self {
            self.binaries.push(name.to_string());
            self
        }

        pub fn with_group(mut self, group: &str) -> Self {
            self.groups.push(group.to_string());
            self
        }

        pub fn with_unit(mut self, unit: &str) -> Self {
            self.units.push(unit.to_string());
            self
        }

        pub fn with_path(mut self, path: impl Into<PathBuf>, state: PathState) -> Self {
            self.paths.insert(path.into(), state);
            self
        }

        pub fn without_manager(mut self) -> Self {
            self.manager = None;
            self.binaries.retain(|b| b != "dnf" && b != "apt-get");
            self
        }
    }

    pub fn owned(owner: &str, group: &str, mode: u32) -> PathState {
        PathState {
            owner: owner.to_string(),
            group: group.to_string(),
            mode,
        }
    }

    impl HostProbe for FakeProbe {
        fn identity(&self) -> VirtupResult<Identity> {
            Ok(self.identity.clone())
        }

        fn member_of(&self, group: &str) -> VirtupResult<bool> {
            Ok(self.groups.iter().any(|g| g == group))
        }

        fn package_manager(&self) -> Option<PackageManager> {
            self.manager
        }

        fn binary_on_path(&self, name: &str) -> bool {
            self.binaries.iter().any(|b| b == name)
        }

        fn unit_registered(&self, unit: &str) -> bool {
            self.units.iter().any(|u| u == unit)
        }

        fn path_state(&self, path: &Path) -> VirtupResult<Option<PathState>> {
            Ok(self.paths.get(path).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_probe_finds_binaries_on_path() {
        // `sh` is on PATH in every environment we run tests in.
        assert!(LiveProbe::new().binary_on_path("sh"));
        assert!(!LiveProbe::new().binary_on_path("definitely-not-a-binary-xyzzy"));
    }

    #[test]
    fn path_state_reports_missing_as_none() {
        let probe = LiveProbe::new();
        let state = probe
            .path_state(Path::new("/nonexistent/virtup/probe/path"))
            .unwrap();
        assert!(state.is_none());
    }

    #[test]
    fn path_state_reads_mode_bits() {
        let dir = tempfile::tempdir().unwrap();
        let probe = LiveProbe::new();
        let state = probe.path_state(dir.path()).unwrap().unwrap();
        assert!(state.mode <= 0o7777);
    }
}
