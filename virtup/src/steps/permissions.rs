//! Pool ownership and permission reconciliation.
//!
//! Disk images in the pool are read and written by the qemu service
//! account, while `pool/upstream` stays writable by the human operator who
//! downloads base images into it. That split is why the recursive chown of
//! the pool must land before the narrower upstream override: the other way
//! around, the recursive pass would clobber the override.

use crate::action::{Action, Owner};
use crate::constants::{POOL_DIR_MODE, libvirt};
use crate::errors::VirtupResult;
use crate::host::probe::{HostProbe, PathState};
use crate::layout::ProvisionLayout;
use crate::steps::{Plan, Step};

/// Reconciles pool ownership with the detected qemu service account.
///
/// The service account is read from the ownership of
/// `/var/lib/libvirt/qemu/`; when that directory is absent the host has no
/// usable virtualization daemon yet and the step is skipped with a warning.
pub struct PermissionsStep;

impl Step for PermissionsStep {
    fn name(&self) -> &'static str {
        "permissions"
    }

    fn plan(&self, probe: &dyn HostProbe) -> VirtupResult<Plan> {
        let Some(service_dir) = probe.path_state(libvirt::QEMU_STATE_DIR.as_ref())? else {
            return Ok(Plan::Skip {
                reason: format!(
                    "{} does not exist; is the libvirt daemon installed and running?",
                    libvirt::QEMU_STATE_DIR
                ),
            });
        };
        let service = Owner::service(service_dir.owner, service_dir.group);

        let identity = probe.identity()?;
        let operator = Owner::login(identity.user.clone());
        let layout = ProvisionLayout::new(&identity.home);

        let base = layout.base_dir();
        let pool = layout.pool_dir();
        let upstream = layout.pool_upstream_dir();

        let pool_state = probe.path_state(&pool)?;
        let upstream_state = probe.path_state(&upstream)?;

        let mut actions = Vec::new();

        // The pool root may not be writable by the invoking user yet, so the
        // tree is created with elevated privilege.
        if pool_state.is_none() || upstream_state.is_none() {
            actions.push(Action::CreateDirPrivileged {
                path: upstream.clone(),
            });
        }

        // Recursive chown first, narrower override second. Ordering matters.
        if !owned_by(&pool_state, &service) {
            actions.push(Action::Chown {
                path: pool.clone(),
                owner: service,
                recursive: true,
            });
            actions.push(Action::Chown {
                path: upstream.clone(),
                owner: operator,
                recursive: false,
            });
        } else if !upstream_state
            .as_ref()
            .is_some_and(|s| s.owner == identity.user)
        {
            actions.push(Action::Chown {
                path: upstream.clone(),
                owner: operator,
                recursive: false,
            });
        }

        for dir in [&base, &pool, &upstream] {
            let mode_ok = probe
                .path_state(dir)?
                .is_some_and(|s| s.mode == POOL_DIR_MODE);
            if !mode_ok {
                actions.push(Action::Chmod {
                    path: dir.clone(),
                    mode: POOL_DIR_MODE,
                });
            }
        }

        // The service account is not in the operator's groups, so it needs
        // other-execute on every ancestor to reach the pool at all.
        let chain = layout.traversal_chain();
        for ancestor in chain.iter().take(chain.len().saturating_sub(1)) {
            let traversable = probe
                .path_state(ancestor)?
                .is_some_and(|s| s.other_can_traverse());
            if !traversable {
                actions.push(Action::GrantTraversal {
                    path: ancestor.clone(),
                });
            }
        }

        if actions.is_empty() {
            return Ok(Plan::Satisfied);
        }

        actions.push(Action::ReportPermissions { paths: chain });
        Ok(Plan::Apply(actions))
    }
}

fn owned_by(state: &Option<PathState>, owner: &Owner) -> bool {
    state.as_ref().is_some_and(|s| {
        s.owner == owner.user && owner.group.as_ref().is_some_and(|g| &s.group == g)
    })
}
