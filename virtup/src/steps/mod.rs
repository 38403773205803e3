//! Provisioning steps.
//!
//! Each step is a pure planner: it reads host facts through
//! [`HostProbe`] and emits a [`Plan`] with zero or more [`Action`]s. Steps
//! never mutate the host themselves.
//!
//! ## Step dependency order
//!
//! ```text
//! packages ──→ group ──→ tool ──→ materialize ──→ permissions
//!                │
//!                └─ may pause the whole run (re-login required)
//! ```
//!
//! `tool` needs pipx from `packages`, `permissions` needs the qemu service
//! account that only exists once libvirt is installed, and everything after
//! `group` assumes active group membership.

pub mod group;
pub mod materialize;
pub mod packages;
pub mod permissions;
pub mod tool;

use crate::action::Action;
use crate::errors::VirtupResult;
use crate::host::probe::HostProbe;

/// What a step wants done, given current host state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    /// Postcondition already holds; nothing to do.
    Satisfied,
    /// Apply these actions, in order.
    Apply(Vec<Action>),
    /// Apply these actions, then stop the whole run successfully and hand
    /// control back to the operator.
    ApplyThenPause { actions: Vec<Action>, reason: String },
    /// Cannot run on this host right now; continue with later steps.
    Skip { reason: String },
}

/// One idempotent provisioning step.
pub trait Step {
    /// Stable identifier used in reports and logs.
    fn name(&self) -> &'static str;

    /// Compute the minimal corrective actions for the current host.
    fn plan(&self, probe: &dyn HostProbe) -> VirtupResult<Plan>;
}

/// The full provisioning sequence, in dependency order.
pub fn default_steps() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(packages::PackagesStep),
        Box::new(group::GroupStep),
        Box::new(tool::ToolStep),
        Box::new(materialize::MaterializeStep),
        Box::new(permissions::PermissionsStep),
    ]
}
