//! Action executors.
//!
//! [`HostExecutor`] applies [`Action`]s to the real machine, shelling out
//! with a `sudo` prefix for privileged operations when not running as root.
//! [`RecordingExecutor`] just captures actions; it backs `--dry-run` and the
//! planning tests.

use crate::action::Action;
use crate::constants::libvirt;
use crate::errors::{VirtupError, VirtupResult};
use crate::host::probe::{HostProbe, LiveProbe};
use std::io;
use std::io::Write;
use std::process::Command;
use tracing::{debug, warn};

/// Applies planned actions.
pub trait Executor {
    fn apply(&mut self, action: &Action) -> VirtupResult<()>;
}

/// Pick the libvirt unit to enable, preferring the daemon over socket
/// activation when both unit files are registered.
pub fn preferred_libvirt_unit(service: bool, socket: bool) -> Option<&'static str> {
    if service {
        Some(libvirt::SERVICE_UNIT)
    } else if socket {
        Some(libvirt::SOCKET_UNIT)
    } else {
        None
    }
}

/// [`Executor`] that mutates the real host.
pub struct HostExecutor {
    use_sudo: bool,
}

impl HostExecutor {
    pub fn new() -> Self {
        Self {
            use_sudo: !nix::unistd::geteuid().is_root(),
        }
    }

    fn privileged(&self, mut argv: Vec<String>) -> Vec<String> {
        if self.use_sudo {
            argv.insert(0, "sudo".to_string());
        }
        argv
    }

    fn run(&self, argv: Vec<String>) -> VirtupResult<()> {
        debug!(command = %argv.join(" "), "running");
        let output = Command::new(&argv[0])
            .args(&argv[1..])
            .output()
            .map_err(|e| VirtupError::command(&argv, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VirtupError::command(
                &argv,
                format!("{} ({})", output.status, stderr.trim()),
            ));
        }
        Ok(())
    }

    fn run_lenient(&self, argv: Vec<String>) {
        if let Err(e) = self.run(argv) {
            warn!("best-effort command failed, continuing: {}", e);
        }
    }

    fn enable_virt_daemon(&self) -> VirtupResult<()> {
        let probe = LiveProbe::new();
        let unit = preferred_libvirt_unit(
            probe.unit_registered(libvirt::SERVICE_UNIT),
            probe.unit_registered(libvirt::SOCKET_UNIT),
        );
        match unit {
            Some(unit) => self.run(self.privileged(vec![
                "systemctl".to_string(),
                "enable".to_string(),
                "--now".to_string(),
                unit.to_string(),
            ])),
            None => {
                warn!("no libvirtd unit registered, skipping daemon enablement");
                Ok(())
            }
        }
    }

    fn write_config_once(&self, path: &std::path::Path, contents: &str) -> VirtupResult<()> {
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())?;
                Ok(())
            }
            // The file appearing between plan and apply is fine; an existing
            // config is never overwritten.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                warn!(path = %path.display(), "config file already exists, leaving it untouched");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn report_permissions(&self, paths: &[std::path::PathBuf]) {
        let probe = LiveProbe::new();
        for path in paths {
            match probe.path_state(path) {
                Ok(Some(state)) => println!(
                    "{:>4o}  {:<12} {:<12} {}",
                    state.mode,
                    state.owner,
                    state.group,
                    path.display()
                ),
                Ok(None) => println!("   -  {:<25} {} (missing)", "", path.display()),
                Err(e) => warn!(path = %path.display(), "could not stat: {}", e),
            }
        }
    }
}

impl Default for HostExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for HostExecutor {
    fn apply(&mut self, action: &Action) -> VirtupResult<()> {
        match action {
            Action::InstallPackages { manager, packages } => {
                self.run(self.privileged(manager.install_argv(packages)))
            }
            Action::EnableVirtDaemon => self.enable_virt_daemon(),
            Action::AddUserToGroup { user, group } => self.run(self.privileged(vec![
                "usermod".to_string(),
                "-a".to_string(),
                "-G".to_string(),
                group.clone(),
                user.clone(),
            ])),
            Action::CreateDirAll { path } => Ok(std::fs::create_dir_all(path)?),
            Action::CreateDirPrivileged { path } => self.run(self.privileged(vec![
                "mkdir".to_string(),
                "-p".to_string(),
                path.display().to_string(),
            ])),
            Action::WriteConfigOnce { path, contents } => self.write_config_once(path, contents),
            Action::Chown {
                path,
                owner,
                recursive,
            } => {
                let mut argv = vec!["chown".to_string()];
                if *recursive {
                    argv.push("-R".to_string());
                }
                argv.push(owner.spec());
                argv.push(path.display().to_string());
                self.run(self.privileged(argv))
            }
            Action::Chmod { path, mode } => self.run(self.privileged(vec![
                "chmod".to_string(),
                format!("{:o}", mode),
                path.display().to_string(),
            ])),
            Action::GrantTraversal { path } => self.run(self.privileged(vec![
                "chmod".to_string(),
                "o+x".to_string(),
                path.display().to_string(),
            ])),
            Action::PipxInstall { package } => self.run(vec![
                "pipx".to_string(),
                "install".to_string(),
                package.clone(),
            ]),
            Action::PipxInject {
                package,
                dependency,
            } => {
                self.run_lenient(vec![
                    "pipx".to_string(),
                    "inject".to_string(),
                    package.clone(),
                    dependency.clone(),
                ]);
                Ok(())
            }
            Action::ReportPermissions { paths } => {
                self.report_permissions(paths);
                Ok(())
            }
        }
    }
}

/// [`Executor`] that records actions instead of applying them.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub actions: Vec<Action>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Executor for RecordingExecutor {
    fn apply(&mut self, action: &Action) -> VirtupResult<()> {
        self.actions.push(action.clone());
        Ok(())
    }
}
