//! skytebane - geolocation record services
//!
//! One binary, one subcommand per service:
//! - `skytebane posts` serves the posts API (/api/posts)
//! - `skytebane points` serves the points API (/api/points)
//!
//! Backend selection (SQLite file vs Supabase) comes from the environment;
//! a `.env` file in the working directory is honored.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use skytebane_server::http::{run_server, ServerConfig, Service};
use skytebane_server::{storage, StorageConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "skytebane",
    version,
    about = "Geolocation record services backed by SQLite or Supabase"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the posts API
    Posts(ServeArgs),
    /// Serve the points API
    Points(ServeArgs),
}

/// Options shared by both services
#[derive(Args, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (service, args) = match cli.command {
        Commands::Posts(args) => (Service::Posts, args),
        Commands::Points(args) => (Service::Points, args),
    };

    let bind_addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .context("invalid bind address")?;

    let config = StorageConfig::from_env().context("failed to resolve storage configuration")?;
    let storage = storage::connect(&config)
        .await
        .context("failed to connect storage backend")?;
    storage
        .init_schema()
        .await
        .context("failed to initialize database schema")?;

    tracing::info!(service = service.name(), "schema ready, starting server");
    run_server(ServerConfig { bind_addr, service }, storage)
        .await
        .context("server error")?;

    Ok(())
}
