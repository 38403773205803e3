//! virtup - host provisioning front-end for virt-lightning.

mod summary;

use anyhow::Result;
use clap::Parser;
use virtup::constants::catalog::IMAGE_INDEX_URL;
use virtup::catalog::{self, ListItemParser};
use virtup::sequencer::{Sequencer, StepStatus};
use virtup::{HostExecutor, HostProbe, LiveProbe, RecordingExecutor};

/// Prepare this machine to run virt-lightning as an unprivileged user.
#[derive(Parser, Debug)]
#[command(
    name = "virtup",
    version,
    about = "Installs libvirt/qemu/pipx, sets up group membership and pool permissions for virt-lightning"
)]
struct Cli {
    /// List the distro images available from the online catalog and exit
    #[arg(long)]
    list_online: bool,

    /// Compute the provisioning plan without changing the host
    #[arg(long)]
    dry_run: bool,

    /// With --dry-run, print the planned actions as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,
}

fn main() -> Result<()> {
    // Respects RUST_LOG; quiet by default so the step output stays readable.
    if let Err(e) = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init()
    {
        eprintln!("failed to initialize tracing: {}", e);
    }

    let cli = Cli::parse();

    if cli.list_online {
        list_online();
        return Ok(());
    }

    let probe = LiveProbe::new();
    if cli.dry_run {
        dry_run(&probe, cli.json)
    } else {
        provision(&probe)
    }
}

fn provision(probe: &dyn HostProbe) -> Result<()> {
    let mut executor = HostExecutor::new();
    let report = Sequencer::new(probe, &mut executor).run()?;

    for (name, status) in &report.steps {
        match status {
            StepStatus::Satisfied => println!("  {:<12} ok (already satisfied)", name),
            StepStatus::Changed(n) => println!("  {:<12} applied {} action(s)", name, n),
            StepStatus::Skipped(reason) => println!("  {:<12} skipped: {}", name, reason),
        }
    }

    if let Some(pause) = report.pause {
        println!("\n{}", pause.reason);
        return Ok(());
    }

    println!();
    summary::print();
    Ok(())
}

fn dry_run(probe: &dyn HostProbe, json: bool) -> Result<()> {
    let mut recorder = RecordingExecutor::new();
    let report = Sequencer::new(probe, &mut recorder).run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recorder.actions)?);
        return Ok(());
    }

    if recorder.actions.is_empty() {
        println!("nothing to do, host is already provisioned");
    } else {
        println!("{} action(s) planned:", recorder.actions.len());
        for action in &recorder.actions {
            println!("  - {:?}", action);
        }
    }
    if let Some(pause) = report.pause {
        println!("run would pause: {}", pause.reason);
    }
    Ok(())
}

fn list_online() {
    let parser = ListItemParser::new();
    for name in catalog::list_online(IMAGE_INDEX_URL, &parser) {
        println!("{}", name);
    }
}
