//! hearth-server binary.
//!
//! A local stand-in for the hosted mock API: reads `config.toml` (or the path
//! given with `--config`), opens the configured record store, and serves the
//! `/familyMembers` collection over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use hearth_api::{ServerConfig, StoreConfig, mounted_router};
use hearth_core::{MemoryStore, RecordStore};
use hearth_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Hearth family-member API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the listening port.
  #[arg(short, long)]
  port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("HEARTH").separator("__"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  if let Some(port) = cli.port {
    server_cfg.port = port;
  }

  match &server_cfg.store {
    StoreConfig::Memory => {
      let store = match &server_cfg.seed {
        Some(path) => {
          let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
          MemoryStore::from_json(&raw)
            .with_context(|| format!("loading seed file {}", path.display()))?
        }
        None => MemoryStore::new(),
      };
      serve(store, &server_cfg).await
    }
    StoreConfig::Sqlite { path } => {
      if server_cfg.seed.is_some() {
        tracing::warn!("seed file is only applied to the memory store; ignoring");
      }
      let store = SqliteStore::open(path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      serve(store, &server_cfg).await
    }
  }
}

async fn serve<S>(store: S, cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: RecordStore + 'static,
{
  let app = mounted_router(Arc::new(store), &cfg.base_path)
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!(
    "Listening on http://{address}{}/familyMembers",
    cfg.base_path.trim_end_matches('/')
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
