//! File logging setup
//!
//! The terminal belongs to the UI while the app runs, so log lines go to a
//! file instead of stderr.

use crate::config::Config;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Default log file location inside the config directory
pub fn default_log_path() -> Option<PathBuf> {
    Config::config_dir().map(|dir| dir.join("attendance-tui.log"))
}

/// Install the global tracing subscriber writing to `path`
///
/// `RUST_LOG` directives are honored on top of `attendance_tui=<level>`.
pub fn init(path: &Path, level: Level) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::from_default_env().add_directive(
        format!("attendance_tui={}", level)
            .parse()
            .context("Invalid log directive")?,
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;

    Ok(())
}
