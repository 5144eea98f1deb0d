//! deepspaced entrypoint.

use anyhow::Result;
use clap::Parser;
use deepspaced::{AppState, DaemonConfig, config, http};
use provider::Qwen;
use std::path::PathBuf;
use tools::Toolbox;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deepspaced", about = "Deepspace chat daemon")]
struct Args {
    /// Configuration directory (defaults to ~/.deepspace)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Listen address override
    #[arg(long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config_dir = args.config_dir.unwrap_or_else(config::global_config_dir);
    let config_path = config_dir.join(config::CONFIG_FILE);
    if !config_path.exists() {
        config::scaffold(&config_dir)?;
        tracing::info!("scaffolded default configuration at {}", config_path.display());
    }

    let mut config = DaemonConfig::load(&config_path)?;
    if let Some(addr) = args.addr {
        config.addr = addr;
    }
    if config.api_key.is_empty() {
        tracing::warn!("api key is empty; set DASHSCOPE_API_KEY or edit {}", config_path.display());
    }

    let provider = Qwen::new(
        reqwest::Client::new(),
        &config.api_key,
        config.base_url.as_deref(),
    )?;
    let state = AppState::new(provider, Toolbox::builtin(), &config);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!("deepspaced listening on {}", config.addr);
    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
