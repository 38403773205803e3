//! Ordered execution of the provisioning steps.

use crate::errors::VirtupResult;
use crate::exec::Executor;
use crate::host::probe::HostProbe;
use crate::steps::{Plan, Step, default_steps};
use tracing::{debug, info, warn};

/// Why a run stopped before the last step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pause {
    pub step: &'static str,
    pub reason: String,
}

/// Per-step result recorded in the run report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// Already satisfied; no actions applied.
    Satisfied,
    /// This many actions were applied.
    Changed(usize),
    /// Step could not run on this host.
    Skipped(String),
}

/// Outcome of one provisioning run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub steps: Vec<(&'static str, StepStatus)>,
    /// Set when a step paused the run for operator action. A paused run is
    /// still a success.
    pub pause: Option<Pause>,
}

impl RunReport {
    /// Total number of actions applied across all steps.
    pub fn actions_applied(&self) -> usize {
        self.steps
            .iter()
            .map(|(_, status)| match status {
                StepStatus::Changed(n) => *n,
                _ => 0,
            })
            .sum()
    }
}

/// Runs the provisioning steps in dependency order against one probe and
/// one executor.
///
/// Each step is planned against the host state current at that point, so a
/// step sees the side effects of every step applied before it. A
/// `Plan::ApplyThenPause` short-circuits the remaining steps.
pub struct Sequencer<'a> {
    probe: &'a dyn HostProbe,
    executor: &'a mut dyn Executor,
    steps: Vec<Box<dyn Step>>,
}

impl<'a> Sequencer<'a> {
    pub fn new(probe: &'a dyn HostProbe, executor: &'a mut dyn Executor) -> Self {
        Self {
            probe,
            executor,
            steps: default_steps(),
        }
    }

    pub fn run(mut self) -> VirtupResult<RunReport> {
        let mut report = RunReport::default();

        for step in &self.steps {
            debug!(step = step.name(), "planning");
            match step.plan(self.probe)? {
                Plan::Satisfied => {
                    info!(step = step.name(), "already satisfied");
                    report.steps.push((step.name(), StepStatus::Satisfied));
                }
                Plan::Apply(actions) => {
                    for action in &actions {
                        self.executor.apply(action)?;
                    }
                    info!(step = step.name(), actions = actions.len(), "applied");
                    report
                        .steps
                        .push((step.name(), StepStatus::Changed(actions.len())));
                }
                Plan::ApplyThenPause { actions, reason } => {
                    for action in &actions {
                        self.executor.apply(action)?;
                    }
                    report
                        .steps
                        .push((step.name(), StepStatus::Changed(actions.len())));
                    report.pause = Some(Pause {
                        step: step.name(),
                        reason,
                    });
                    return Ok(report);
                }
                Plan::Skip { reason } => {
                    warn!(step = step.name(), "skipped: {}", reason);
                    report.steps.push((step.name(), StepStatus::Skipped(reason)));
                }
            }
        }

        Ok(report)
    }
}
