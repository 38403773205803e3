//! System package manager detection and invocation shapes.

use serde::Serialize;
use std::fmt;

/// The two supported system package managers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageManager {
    Dnf,
    AptGet,
}

impl PackageManager {
    /// Binary name on PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Dnf => "dnf",
            PackageManager::AptGet => "apt-get",
        }
    }

    /// Packages that provide libvirt, qemu and pipx on this distro family.
    pub fn virtualization_packages(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Dnf => &["libvirt", "libvirt-client", "qemu-kvm", "pipx"],
            PackageManager::AptGet => &[
                "libvirt-daemon-system",
                "libvirt-clients",
                "qemu-system-x86",
                "pipx",
            ],
        }
    }

    /// Non-interactive install argv (without a sudo prefix).
    pub fn install_argv(&self, packages: &[String]) -> Vec<String> {
        let mut argv = vec![
            self.binary().to_string(),
            "install".to_string(),
            "-y".to_string(),
        ];
        argv.extend(packages.iter().cloned());
        argv
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}
