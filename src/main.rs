mod api;
mod app;
mod cache;
mod commands;
mod config;
mod dashboard;
mod event;
mod export;
mod fetch;
mod filter;
mod logging;
mod query;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use crate::api::LiveClient;
use crate::cache::{CacheStore, NoopStore, SqliteStore};
use crate::ui::view::ViewContext;

#[derive(Parser, Debug)]
#[command(name = "rwlive")]
#[command(about = "A terminal UI for the ransomware.live API, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/rwlive/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base URL, overriding the config file
  #[arg(long)]
  base_url: Option<String>,

  /// Neither read nor write the response cache
  #[arg(long)]
  no_cache: bool,

  #[command(subcommand)]
  command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
  /// Fetch one API path (e.g. /groups) and print its JSON payload
  Fetch {
    /// Path relative to the API base URL
    path: String,
  },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref())?
    .with_overrides(args.base_url, args.no_cache);
  config.validate()?;

  let _log_guard = logging::init(&logging::default_dir()?)?;
  info!(base_url = %config.api.base_url, cache = config.cache.enabled, "starting");

  let store = open_store(&config)?;
  let client = LiveClient::from_config(&config, store)?;

  match args.command {
    Some(Cmd::Fetch { path }) => fetch_once(&client, &path).await,
    None => {
      let ctx = ViewContext {
        client,
        export_dir: config.export_dir(),
      };
      let mut app = app::App::new(ctx);
      app.run().await?;
      Ok(ExitCode::SUCCESS)
    }
  }
}

fn open_store(config: &config::Config) -> Result<Arc<dyn CacheStore>> {
  if !config.cache.enabled {
    info!("response cache disabled");
    return Ok(Arc::new(NoopStore));
  }

  let path = config.cache_path()?;
  let store = SqliteStore::open(&path)
    .map_err(|e| eyre!("Failed to open cache at {}: {}", path.display(), e))?;
  info!(path = %path.display(), ttl_secs = config.cache.ttl_secs, "response cache ready");
  Ok(Arc::new(store))
}

/// Print the payload for `path` to stdout. Exits with 1 when there is none.
async fn fetch_once(client: &LiveClient, path: &str) -> Result<ExitCode> {
  match client.raw(path).await {
    Some(payload) => {
      info!(path, "fetch subcommand");
      println!("{}", serde_json::to_string_pretty(&payload)?);
      Ok(ExitCode::SUCCESS)
    }
    None => {
      info!(path, "fetch subcommand returned nothing");
      eprintln!("No data for {} (see the log for details)", path);
      Ok(ExitCode::FAILURE)
    }
  }
}
