//! Fixed names shared across the provisioning steps.
//!
//! Everything here is an external contract: OS group and unit names, the
//! packages the two supported distro families ship libvirt under, and the
//! layout the downstream tool expects.

/// Virtualization daemon and its access group.
pub mod libvirt {
    /// Group whose members may talk to the libvirt daemon socket.
    pub const GROUP: &str = "libvirt";

    /// Presence of this binary marks the virtualization packages as installed.
    pub const CAPABILITY_MARKER: &str = "virsh";

    /// Preferred daemon unit.
    pub const SERVICE_UNIT: &str = "libvirtd.service";

    /// Socket-activated fallback unit.
    pub const SOCKET_UNIT: &str = "libvirtd.socket";

    /// Ownership of this directory reveals the qemu service account.
    pub const QEMU_STATE_DIR: &str = "/var/lib/libvirt/qemu";
}

/// The downstream VM tool installed through pipx.
pub mod tool {
    /// pipx package name.
    pub const PACKAGE: &str = "virt-lightning";

    /// Binary the package puts on PATH.
    pub const BINARY: &str = "vl";

    /// Injected into the pipx venv to enable remote distro listing.
    pub const LISTING_DEPENDENCY: &str = "beautifulsoup4";

    /// The isolated-environment installer itself.
    pub const INSTALLER: &str = "pipx";
}

/// Online image catalog.
pub mod catalog {
    /// HTML index of the distro images virt-lightning can fetch.
    pub const IMAGE_INDEX_URL: &str = "https://virt-lightning.org/images/";
}

/// Mode applied to the pool directories: group rwx for the service
/// account, no world write.
pub const POOL_DIR_MODE: u32 = 0o775;
