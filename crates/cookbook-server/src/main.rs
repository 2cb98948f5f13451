//! cookbook server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus any
//! `COOKBOOK_*` environment overrides, opens the SQLite store, and either
//! serves the catalog over HTTP or runs a one-shot maintenance command.
//!
//! ```sh
//! cargo run -p cookbook-server -- seed
//! cargo run -p cookbook-server -- serve
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cookbook_core::store::RecipeStore as _;
use cookbook_server::ServerConfig;
use cookbook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Cookbook analysis-recipe catalog")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Command {
  /// Serve the HTTP API and static front end (default).
  #[default]
  Serve,
  /// Create the database schema if it is missing, then exit.
  InitDb,
  /// Insert the sample domains, recipes and notes unless data exists.
  Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = open_store(&server_cfg).await?;

  match cli.command.unwrap_or_default() {
    Command::InitDb => {
      tracing::info!("database ready");
    }
    Command::Seed => {
      let outcome = store.seed().await.context("failed to seed sample data")?;
      println!("{outcome}");
    }
    Command::Serve => serve(store, &server_cfg).await?,
  }

  Ok(())
}

/// Open the SQLite store, creating its parent directory first.
async fn open_store(server_cfg: &ServerConfig) -> anyhow::Result<SqliteStore> {
  let store_path = server_cfg.resolved_store_path();

  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create store directory {parent:?}"))?;
  }

  SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))
}

async fn serve(store: SqliteStore, server_cfg: &ServerConfig) -> anyhow::Result<()> {
  let app = cookbook_server::router(Arc::new(store), server_cfg);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
