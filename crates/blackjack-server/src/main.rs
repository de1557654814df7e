//! LAN Blackjack Server entry point.
//!
//! Loads configuration, starts the offer broadcaster and the TCP accept loop,
//! and waits for Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML file + command-line overrides
//!  └─ start services
//!       ├─ OfferBroadcaster     (Tokio task, UDP)
//!       └─ GameListener         (accept loop, one task per session)
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use blackjack_server::application::serve_session::SessionOptions;
use blackjack_server::infrastructure::network::{
    broadcaster::{BroadcastConfig, OfferBroadcaster},
    listener::GameListener,
};
use blackjack_server::infrastructure::storage::config::load_config;

/// Command-line options.  Flags override the config file.
#[derive(Debug, Parser)]
#[command(name = "blackjack-server", version, about = "Deal LAN Blackjack to discovered clients")]
struct Cli {
    /// Path to the TOML config file (defaults to the platform config dir).
    #[arg(long, env = "BLACKJACK_SERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Name advertised in offers.
    #[arg(long)]
    name: Option<String>,

    /// TCP port for game sessions (0 picks a free port).
    #[arg(long)]
    port: Option<u16>,

    /// UDP port clients listen on for offers.
    #[arg(long)]
    discovery_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("loading server config")?;
    if let Some(name) = cli.name {
        config.server.name = name;
    }
    if let Some(port) = cli.port {
        config.network.tcp_port = port;
    }
    if let Some(port) = cli.discovery_port {
        config.network.discovery_port = port;
    }

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    info!("LAN Blackjack Server starting as {:?}", config.server.name);

    // Shutdown signal shared by the broadcaster and the accept loop.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── TCP listener ──────────────────────────────────────────────────────────
    let listener = GameListener::bind(
        config.network.listen_addr(),
        SessionOptions::from(&config.session),
    )
    .await
    .context("binding game listener")?;
    let local = listener.local_addr()?;
    info!("server started, listening on {local}");

    // ── Offer broadcaster ─────────────────────────────────────────────────────
    let broadcast_cfg = BroadcastConfig {
        target: config.network.broadcast_target(),
        interval: config.network.offer_interval(),
        tcp_port: local.port(),
        server_name: config.server.name.clone(),
    };
    let broadcaster = match OfferBroadcaster::bind(&broadcast_cfg).await {
        Ok(b) => Some(tokio::spawn(b.run(shutdown_rx.clone()))),
        Err(e) => {
            error!("failed to start offer broadcaster: {e}");
            None
        }
    };

    // ── Accept loop + Ctrl-C handling ─────────────────────────────────────────
    // The first Ctrl-C stops new sessions and waits for running ones; a second
    // one abandons them.
    let accept = listener.run(shutdown_rx);
    tokio::pin!(accept);
    tokio::select! {
        _ = &mut accept => {}
        _ = async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received; finishing running sessions");
                let _ = shutdown_tx.send(true);
            }
            let _ = tokio::signal::ctrl_c().await;
        } => warn!("second shutdown signal; abandoning running sessions"),
    }

    if let Some(handle) = broadcaster {
        if let Err(e) = handle.await {
            error!("offer broadcaster task failed: {e}");
        }
    }

    info!("LAN Blackjack Server stopped");
    Ok(())
}
