//! Tracing setup.
//!
//! Logs always go to stderr. When a log directory is configured, a second
//! plain-text layer writes to a timestamped file in it. Failing to create
//! that file is reported as a warning and never stops the simulator.

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str =
    "dronesim_core=info,dronesim_runtime=info,dronesim_cli=info,dronesim=info";

/// Build the log file name for a given start time.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("drone_telemetry_{}.log", started.format("%Y-%m-%d_%H-%M-%S"))
}

/// Create the log directory if needed and open a fresh log file in it.
pub fn open_log_file(dir: &Path) -> io::Result<(PathBuf, File)> {
    fs::create_dir_all(dir)?;
    let path = dir.join(log_file_name(Local::now()));
    let file = File::create(&path)?;
    Ok((path, file))
}

/// Build the level filter from a `RUST_LOG` value, falling back to
/// [`DEFAULT_DIRECTIVES`].
pub fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber. Returns the log file path if file
/// logging is active.
pub fn init(log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let opened = log_dir.map(|dir| (dir.to_path_buf(), open_log_file(dir)));

    let (log_path, file_layer, file_error) = match opened {
        Some((_, Ok((path, file)))) => {
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(path), Some(layer), None)
        }
        Some((dir, Err(e))) => (None, None, Some((dir, e))),
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(env_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .try_init()?;

    if let Some((dir, e)) = file_error {
        tracing::warn!(
            "File logging disabled, could not open log in {}: {}",
            dir.display(),
            e
        );
    }
    if let Some(path) = &log_path {
        tracing::debug!("Logging to {}", path.display());
    }

    Ok(log_path)
}
