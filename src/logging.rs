//! File logging. The terminal belongs to the UI, so logs go to a daily
//! rolling file under the data directory.

use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "rwlive=info";

/// Install the global subscriber writing to `<dir>/rwlive.log.<date>`.
///
/// `RUST_LOG` overrides the default filter. Keep the returned guard alive
/// for the life of the program; dropping it flushes buffered lines.
pub fn init(dir: &Path) -> Result<WorkerGuard> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(dir, "rwlive.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

  fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .with_target(true)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}

/// `$XDG_DATA_HOME/rwlive/logs`
pub fn default_dir() -> Result<PathBuf> {
  Ok(crate::config::data_dir()?.join("logs"))
}
