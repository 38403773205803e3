//! User directory and configuration materialization.

use crate::action::Action;
use crate::errors::VirtupResult;
use crate::host::probe::HostProbe;
use crate::layout::ProvisionLayout;
use crate::steps::{Plan, Step};

/// Creates the image cache and config directories and writes the default
/// configuration file.
///
/// The config file is first-run-only: it is planned only when absent and the
/// executor refuses to truncate an existing file besides.
pub struct MaterializeStep;

impl Step for MaterializeStep {
    fn name(&self) -> &'static str {
        "materialize"
    }

    fn plan(&self, probe: &dyn HostProbe) -> VirtupResult<Plan> {
        let identity = probe.identity()?;
        let layout = ProvisionLayout::new(&identity.home);
        let mut actions = Vec::new();

        for dir in [layout.image_cache_dir(), layout.config_dir()] {
            if probe.path_state(&dir)?.is_none() {
                actions.push(Action::CreateDirAll { path: dir });
            }
        }

        let config = layout.config_file();
        if probe.path_state(&config)?.is_none() {
            actions.push(Action::WriteConfigOnce {
                path: config,
                contents: layout.render_config(),
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
    use crate::host::probe::fake::{FakeProbe, owned};
    use std::path::PathBuf;

    #[test]
    fn first_run_creates_dirs_and_config() {
        let probe = FakeProbe::bare();
        let Plan::Apply(actions) = MaterializeStep.plan(&probe).unwrap() else {
            panic!("expected an apply plan");
        };
        assert_eq!(actions.len(), 3);
        assert!(matches!(&actions[0], Action::CreateDirAll { path }
            if path.ends_with("images/upstream")));
        assert!(matches!(&actions[1], Action::CreateDirAll { path }
            if path.ends_with(".config/virt-lightning")));
        assert!(matches!(&actions[2], Action::WriteConfigOnce { contents, .. }
            if contents.contains("storage_dir = /home/alice/.local/share/virt-lightning/pool")));
    }

    #[test]
    fn existing_config_is_never_rewritten() {
        let layout = ProvisionLayout::new("/home/alice");
        let probe = FakeProbe::bare()
            .with_path(layout.image_cache_dir(), owned("alice", "alice", 0o755))
            .with_path(layout.config_dir(), owned("alice", "alice", 0o755))
            .with_path(layout.config_file(), owned("alice", "alice", 0o644));

        assert_eq!(MaterializeStep.plan(&probe).unwrap(), Plan::Satisfied);
    }

    #[test]
    fn missing_config_alone_plans_only_the_write() {
        let layout = ProvisionLayout::new("/home/alice");
        let probe = FakeProbe::bare()
            .with_path(layout.image_cache_dir(), owned("alice", "alice", 0o755))
            .with_path(layout.config_dir(), owned("alice", "alice", 0o755));

        let Plan::Apply(actions) = MaterializeStep.plan(&probe).unwrap() else {
            panic!("expected an apply plan");
        };
        assert_eq!(actions.len(), 1);
        assert!(matches!(&actions[0], Action::WriteConfigOnce { path, .. }
            if path == &PathBuf::from("/home/alice/.config/virt-lightning/config.ini")));
    }
}
