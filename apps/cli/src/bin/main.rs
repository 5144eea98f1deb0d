//! deepspace entrypoint.

use anyhow::Result;
use clap::Parser;
use deepspace_cli::{DaemonClient, Repl};
use history::{FileStore, SessionStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deepspace", about = "Deepspace terminal chat client")]
struct Args {
    /// Daemon base URL
    #[arg(long, default_value = "http://127.0.0.1:3210")]
    url: String,

    /// History file override (defaults to ~/.deepspace/history.json)
    #[arg(long)]
    history: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();
    let history_path = args.history.unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".deepspace")
            .join("history.json")
    });

    let sessions = SessionStore::open(FileStore::open(history_path)?);
    let mut repl = Repl::new(DaemonClient::new(args.url), sessions)?;
    repl.run().await
}
