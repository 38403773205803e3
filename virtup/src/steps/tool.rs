//! virt-lightning installation through pipx.

use crate::action::Action;
use crate::constants::tool;
use crate::errors::{VirtupError, VirtupResult};
use crate::host::probe::HostProbe;
use crate::steps::{Plan, Step};

/// Installs virt-lightning into its own pipx environment.
///
/// pipx itself is installed through the system package manager when missing;
/// lacking both pipx and a package manager is fatal. The beautifulsoup4
/// inject enables the remote distro listing feature and is best-effort on
/// the apply side.
pub struct ToolStep;

impl Step for ToolStep {
    fn name(&self) -> &'static str {
        "tool"
    }

    fn plan(&self, probe: &dyn HostProbe) -> VirtupResult<Plan> {
        let mut actions = Vec::new();

        if !probe.binary_on_path(tool::INSTALLER) {
            let manager = probe.package_manager().ok_or_else(|| {
                VirtupError::UnsupportedHost(format!(
                    "{} is not installed and no supported package manager can provide it",
                    tool::INSTALLER
                ))
            })?;
            actions.push(Action::InstallPackages {
                manager,
                packages: vec![tool::INSTALLER.to_string()],
            });
        }

        if !probe.binary_on_path(tool::BINARY) {
            actions.push(Action::PipxInstall {
                package: tool::PACKAGE.to_string(),
            });
            actions.push(Action::PipxInject {
                package: tool::PACKAGE.to_string(),
                dependency: tool::LISTING_DEPENDENCY.to_string(),
            });
        }

        if actions.is_empty() {
            Ok(Plan::Satisfied)
        } else {
            Ok(Plan::Apply(actions))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::probe::fake::FakeProbe;

    #[test]
    fn satisfied_when_tool_and_pipx_present() {
        let probe = FakeProbe::bare().with_binary("pipx").with_binary("vl");
        assert_eq!(ToolStep.plan(&probe).unwrap(), Plan::Satisfied);
    }

    #[test]
    fn installs_pipx_then_tool_then_inject() {
        let probe = FakeProbe::bare();
        let Plan::Apply(actions) = ToolStep.plan(&probe).unwrap() else {
            panic!("expected an apply plan");
        };
        assert_eq!(actions.len(), 3);
        assert!(matches!(&actions[0], Action::InstallPackages { packages, .. }
            if packages == &vec!["pipx".to_string()]));
        assert!(matches!(&actions[1], Action::PipxInstall { package }
            if package == "virt-lightning"));
        assert!(matches!(&actions[2], Action::PipxInject { dependency, .. }
            if dependency == "beautifulsoup4"));
    }

    #[test]
    fn skips_pipx_install_when_present() {
        let probe = FakeProbe::bare().with_binary("pipx");
        let Plan::Apply(actions) = ToolStep.plan(&probe).unwrap() else {
            panic!("expected an apply plan");
        };
        assert!(matches!(&actions[0], Action::PipxInstall { .. }));
    }

    #[test]
    fn fatal_when_pipx_unobtainable() {
        let probe = FakeProbe::bare().without_manager();
        let err = ToolStep.plan(&probe).unwrap_err();
        assert!(matches!(err, VirtupError::UnsupportedHost(_)));
    }
}
