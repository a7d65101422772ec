//! winmax
//!
//! Single-shot toggle, typically bound to a hotkey:
//! `winmax [MONITOR]` maximizes the focused window onto monitor `MONITOR`
//! (default: primary) or restores it if it is already maximized there.
//!
//! Every expected path exits silently. Unexpected faults are logged and
//! returned from `main`.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, warn};
use winmax::{logging, Config};

#[derive(Parser)]
#[command(name = "winmax")]
#[command(author, version, about = "Maximize the focused window onto a monitor, or restore it")]
struct Cli {
    /// Target monitor index (default: primary). Unparsable values select the primary.
    #[arg(allow_negative_numbers = true)]
    monitor: Option<String>,

    /// Print attached monitors and exit
    #[arg(long)]
    list_monitors: bool,

    /// Load configuration from this file instead of the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config file must not stop the toggle.
    let loaded = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let (mut config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let config_warnings = config.validate();

    let state_dir = config.state_dir();
    let log_dir = config.storage.log_to_file.then_some(state_dir.as_path());
    logging::init(&config.behavior.log_level, log_dir);

    if let Some(e) = load_error {
        warn!("Failed to load configuration: {:#}. Using defaults.", e);
    }
    for w in &config_warnings {
        warn!("Config: {} - {}", w.field, w.message);
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!("Panic: {}", info);
        default_hook(info);
    }));

    debug!("winmax {} starting, args: {:?}", env!("CARGO_PKG_VERSION"), cli.monitor);

    let result = run(&cli, &config, state_dir);
    if let Err(e) = &result {
        error!("Unexpected failure: {:#}", e);
    }
    result
}

#[cfg(windows)]
fn run(cli: &Cli, config: &Config, state_dir: PathBuf) -> Result<()> {
    use anyhow::Context;
    use winmax::{RunOutcome, StateStore, ToggleController};
    use winmax_core::GeometryProvider;
    use winmax_platform_win32::{set_dpi_awareness, Win32Geometry};

    if !set_dpi_awareness() {
        debug!("DPI awareness already set for this process");
    }

    let provider = Win32Geometry::new();

    if cli.list_monitors {
        let monitors = provider
            .list_monitors()
            .context("Failed to enumerate monitors")?;
        for (index, m) in monitors.iter().enumerate() {
            println!(
                "{}: {} {} (work area: {}){}",
                index,
                m.id,
                m.bounds,
                m.work_area,
                if m.is_primary { " [primary]" } else { "" }
            );
        }
        return Ok(());
    }

    let controller = ToggleController::new(provider, StateStore::new(state_dir));
    let outcome = controller
        .run(cli.monitor.as_deref(), config.behavior.settle_delay())
        .context("Failed to enumerate monitors")?;

    match outcome {
        RunOutcome::Toggled(outcome) => debug!("Done: {:?}", outcome),
        other => tracing::info!("No action: {:?}", other),
    }
    Ok(())
}

#[cfg(not(windows))]
fn run(_cli: &Cli, _config: &Config, _state_dir: PathBuf) -> Result<()> {
    anyhow::bail!("winmax only supports Windows")
}
