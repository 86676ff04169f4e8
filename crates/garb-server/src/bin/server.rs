//! garb-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), connects
//! to the Supabase project, and serves the AI proxy functions over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use garb_ai::gateway::HttpGateway;
use garb_server::{AppState, ServerConfig};
use garb_store_supabase::{SupabaseConfig, SupabaseStore};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Garb AI proxy server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("GARB"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if server_cfg.ai_api_key.is_empty() {
    tracing::warn!("ai_api_key is empty; AI routes will fail until it is set");
  }

  // Connect the store and the gateway.
  let store = SupabaseStore::new(SupabaseConfig {
    base_url:    server_cfg.supabase_url.clone(),
    service_key: server_cfg.supabase_service_key.clone(),
  })
  .context("failed to build Supabase client")?;

  let gateway = HttpGateway::new(
    server_cfg.ai_gateway_url.clone(),
    server_cfg.ai_api_key.clone(),
  );

  let state = AppState {
    store:   Arc::new(store),
    gateway: Arc::new(gateway),
  };

  let app = garb_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
