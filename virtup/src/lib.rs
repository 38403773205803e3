//! virtup - prepare a Linux host to run virt-lightning unprivileged
//!
//! This crate plans and applies the handful of host mutations needed before
//! an unprivileged user can manage VMs with virt-lightning: system packages,
//! libvirt group membership, a pipx-installed tool, the data/config
//! directories, and the split pool ownership between the qemu service
//! account and the operator.
//!
//! Planning (pure, probe-driven) and applying (executor-driven) are
//! separate so the whole decision surface is testable without touching a
//! real host.

pub mod action;
pub mod catalog;
pub mod constants;
pub mod errors;
pub mod exec;
pub mod host;
pub mod layout;
pub mod sequencer;
pub mod steps;

pub use action::{Action, Owner};
pub use errors::{VirtupError, VirtupResult};
pub use exec::{Executor, HostExecutor, RecordingExecutor};
pub use host::{HostProbe, LiveProbe};
pub use layout::ProvisionLayout;
pub use sequencer::{RunReport, Sequencer, StepStatus};
