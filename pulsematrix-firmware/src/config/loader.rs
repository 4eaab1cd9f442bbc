//! Configuration loading
//!
//! Reads the application configuration from a TOML file. Every table and
//! key is optional; missing values take the stock defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use pulsematrix_core::config::{Config, MAX_INTENSITY, MIN_TRIGGER_PULSE_US};

/// Parse a configuration document
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text).context("invalid configuration")?;
    warn_on_clamped(&config);
    Ok(config)
}

/// Load configuration from a file
///
/// The file was asked for explicitly, so a missing or malformed file is an
/// error rather than a silent fallback to defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    info!("Loading configuration from {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = parse_config(&text).with_context(|| format!("in {}", path.display()))?;
    debug!("{:?}", config);
    Ok(config)
}

/// Report values that will be adjusted at use
fn warn_on_clamped(config: &Config) {
    if config.ranging.trigger_pulse_us < MIN_TRIGGER_PULSE_US {
        warn!(
            "ranging.trigger_pulse_us {} below minimum, using {}",
            config.ranging.trigger_pulse_us, MIN_TRIGGER_PULSE_US
        );
    }
    if config.display.intensity > MAX_INTENSITY {
        warn!(
            "display.intensity {} above maximum, using {}",
            config.display.intensity, MAX_INTENSITY
        );
    }
}
