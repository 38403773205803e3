//! Group membership gate.

use crate::action::Action;
use crate::constants::libvirt;
use crate::errors::VirtupResult;
use crate::host::probe::HostProbe;
use crate::steps::{Plan, Step};

/// Ensures the invoking user belongs to the libvirt group.
///
/// Membership is read from the running session's groups. A session cannot
/// pick up a fresh group without re-authenticating, so when the user has to
/// be added, the plan pauses the entire run: every later step assumes the
/// membership is already active.
pub struct GroupStep;

impl Step for GroupStep {
    fn name(&self) -> &'static str {
        "group"
    }

    fn plan(&self, probe: &dyn HostProbe) -> VirtupResult<Plan> {
        if probe.member_of(libvirt::GROUP)? {
            return Ok(Plan::Satisfied);
        }

        let identity = probe.identity()?;
        Ok(Plan::ApplyThenPause {
            actions: vec![Action::AddUserToGroup {
                user: identity.user.clone(),
                group: libvirt::GROUP.to_string(),
            }],
            reason: format!(
                "{} was added to the '{}' group; log out and back in, then re-run virtup",
                identity.user,
                libvirt::GROUP
            ),
        })
    }
}
