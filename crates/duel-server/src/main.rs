//! WebSocket server for two-player chess duels.
//!
//! The first connection takes the white seat, the second the black seat and
//! starts the game; anyone else is turned away until a seat frees up.
//! Configuration comes from `duel.toml` (see [`config::Config`]) and can be
//! overridden on the command line.

mod config;
mod connection;
mod hub;

use std::path::PathBuf;

use clap::Parser;
use duel_session::{ParticipantId, Session};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "duel-server", about = "Referee a chess duel between two WebSocket clients")]
struct Args {
    /// Path to the configuration file (defaults to ./duel.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).await?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &config.source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No duel.toml found, using defaults"),
    }

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Duel server listening on ws://{}", listener.local_addr()?);

    let (hub, _hub_task) = hub::spawn(Session::new(config.session_options()));

    let mut next_id = 0u64;
    while let Ok((stream, peer)) = listener.accept().await {
        next_id += 1;
        let id = ParticipantId(next_id);
        let hub = hub.clone();
        tokio::spawn(async move {
            if let Err(e) = connection::serve(stream, peer, id, hub).await {
                warn!(%peer, participant = %id, "Connection error: {}", e);
            }
        });
    }

    Ok(())
}
