//! pulsematrix
//!
//! Reads an ultrasonic ranger and animates a running figure on an 8x8 LED
//! matrix. The figure runs right while the object moves away, left while
//! it approaches, and speeds up when the object is close.
//!
//! Two worker threads share only the latest distance:
//!
//! ```text
//!   ranging ──write──▶ DistanceCell ──read──▶ display ──SPI──▶ MAX7219
//! ```

mod board;
mod config;
mod signals;
mod tasks;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
// std critical-section implementation backing the distance cell lock
use critical_section as _;

use pulsematrix_core::config::Config;
use pulsematrix_core::sync::{DistanceCell, StopFlag};
use pulsematrix_hal_linux::SysfsGpio;

use crate::config::load_config;
use crate::tasks::{display_task, ranging_task};

/// Ultrasonic distance to LED matrix animation
#[derive(Parser, Debug)]
#[command(name = "pulsematrix", version, about, long_about = None)]
struct Args {
    /// TOML configuration file (stock defaults if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run worker threads at normal priority
    #[arg(long)]
    no_realtime: bool,

    /// Log filter, e.g. "debug" or "pulsematrix=trace" (overrides RUST_LOG)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_logging(filter: Option<&str>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let priority = if args.no_realtime {
        None
    } else {
        config.scheduling.realtime_priority
    };

    // Before any thread exists, so the mask is inherited
    signals::block_termination().context("failed to block termination signals")?;
    let stop = Arc::new(StopFlag::new());
    signals::spawn_watcher(Arc::clone(&stop)).context("failed to start signal watcher")?;

    info!("Starting pulsematrix");
    let gpio = SysfsGpio::new();
    board::init(&gpio);

    let cell = Arc::new(DistanceCell::default());

    let ranging = {
        let (gpio, cell, stop) = (gpio.clone(), Arc::clone(&cell), Arc::clone(&stop));
        let ranging_config = config.ranging;
        thread::Builder::new()
            .name("ranging".into())
            .spawn(move || ranging_task(gpio, ranging_config, cell, stop, priority))
            .context("failed to spawn ranging thread")?
    };
    let display = {
        let (gpio, cell, stop) = (gpio.clone(), Arc::clone(&cell), Arc::clone(&stop));
        let display_config = config.display.clone();
        thread::Builder::new()
            .name("display".into())
            .spawn(move || display_task(gpio, display_config, cell, stop, priority))
            .context("failed to spawn display thread")?
    };

    for (name, handle) in [("ranging", ranging), ("display", display)] {
        if handle.join().is_err() {
            error!("{} thread panicked", name);
        }
    }

    board::release(&gpio);
    info!("Shutdown complete");
    Ok(())
}
