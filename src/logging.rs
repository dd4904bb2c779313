use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

/// Route `tracing` output to a log file when `RUST_LOG` is set. The terminal
/// belongs to the TUI, so nothing is ever written to stderr.
pub fn init() -> std::io::Result<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => return Ok(false),
    };
    let Some(path) = AppDirs::log_path() else {
        return Ok(false);
    };
    init_with(filter, &path)?;
    Ok(true)
}

fn init_with(filter: EnvFilter, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // A second init (tests, reruns) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
