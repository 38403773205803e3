//! Post-provisioning command reference.

/// Printed after a completed provisioning run.
const SUMMARY: &str = "\
Your host is ready for virt-lightning.

Common commands:
  vl fetch debian-12        download a base image into the pool
  vl up                     start the VMs described in virt-lightning.yaml
  vl down                   destroy them
  vl ssh <name>             open a shell in a running VM
  vl status                 show the running VMs
  vl distro_list            list the distros available locally

virtup commands:
  virtup                    (re-)run host provisioning, idempotent
  virtup --list-online      list the distro images available online
  virtup --dry-run          show what provisioning would change";

pub fn print() {
    println!("{}", SUMMARY);
}
