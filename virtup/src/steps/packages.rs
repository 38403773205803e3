//! System package installation.

use crate::action::Action;
use crate::constants::libvirt;
use crate::errors::{VirtupError, VirtupResult};
use crate::host::probe::HostProbe;
use crate::steps::{Plan, Step};

/// Installs libvirt, qemu and pipx through the detected package manager and
/// enables the virtualization daemon.
///
/// `virsh` on PATH is the capability marker: when it is present the whole
/// step is considered satisfied and nothing is reinstalled.
pub struct PackagesStep;

impl Step for PackagesStep {
    fn name(&self) -> &'static str {
        "packages"
    }

    fn plan(&self, probe: &dyn HostProbe) -> VirtupResult<Plan> {
        if probe.binary_on_path(libvirt::CAPABILITY_MARKER) {
            return Ok(Plan::Satisfied);
        }

        let manager = probe.package_manager().ok_or_else(|| {
            VirtupError::UnsupportedHost(
                "no supported package manager found (need dnf or apt-get)".to_string(),
            )
        })?;

        Ok(Plan::Apply(vec![
            Action::InstallPackages {
                manager,
                packages: manager
                    .virtualization_packages()
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
            },
            Action::EnableVirtDaemon,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::probe::fake::FakeProbe;

    #[test]
    fn satisfied_when_virsh_present() {
        let probe = FakeProbe::bare().with_binary("virsh");
        assert_eq!(PackagesStep.plan(&probe).unwrap(), Plan::Satisfied);
    }

    #[test]
    fn plans_install_and_daemon_enable() {
        let probe = FakeProbe::bare();
        let Plan::Apply(actions) = PackagesStep.plan(&probe).unwrap() else {
            panic!("expected an apply plan");
        };
        assert_eq!(actions.len(), 2);
        assert!(matches!(
            &actions[0],
            Action::InstallPackages { packages, .. } if packages.contains(&"pipx".to_string())
        ));
        assert_eq!(actions[1], Action::EnableVirtDaemon);
    }

    #[test]
    fn fatal_without_package_manager() {
        let probe = FakeProbe::bare().without_manager();
        let err = PackagesStep.plan(&probe).unwrap_err();
        assert!(matches!(err, VirtupError::UnsupportedHost(_)));
    }
}
