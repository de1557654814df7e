//! LAN Blackjack Client entry point.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()               -- TOML file + command-line overrides
//!  └─ loop until Ctrl-C
//!       ├─ DiscoveryListener      -- wait for an OFFER
//!       ├─ connect()              -- TCP to sender IP + advertised port
//!       ├─ prompt_rounds()        -- unless --rounds was given
//!       └─ play_session()         -- REQUEST, then N rounds
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use blackjack_client::application::{
    play_session::{pause_before_retry, play_session, ClientStats},
    seat::{AutoSeat, PlayerSeat},
};
use blackjack_client::infrastructure::{
    console::ConsoleSeat,
    network::{connect, discovery::DiscoveryListener},
    storage::config::{load_config, ClientConfig},
};

/// Command-line options.  Flags override the config file.
#[derive(Debug, Parser)]
#[command(name = "blackjack-client", version, about = "Find a LAN Blackjack table and play")]
struct Cli {
    /// Path to the TOML config file (defaults to the platform config dir).
    #[arg(long, env = "BLACKJACK_CLIENT_CONFIG")]
    config: Option<PathBuf>,

    /// Player name sent to the server.
    #[arg(long)]
    name: Option<String>,

    /// UDP port to listen on for offers.
    #[arg(long)]
    discovery_port: Option<u16>,

    /// Rounds per session; skips the interactive prompt.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    rounds: Option<u8>,

    /// Let the built-in policy play (hit below 17, otherwise stand).
    #[arg(long)]
    auto: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("loading client config")?;
    if let Some(name) = cli.name {
        config.client.name = name;
    }
    if let Some(port) = cli.discovery_port {
        config.network.discovery_port = port;
    }

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.client.log_level)),
        )
        .init();

    info!("LAN Blackjack Client starting as {:?}", config.client.name);

    let mut console = ConsoleSeat::stdio();
    let mut auto = cli.auto.then(AutoSeat::default);
    let mut stats = ClientStats::default();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let outcome = tokio::select! {
            _ = &mut ctrl_c => break,
            outcome = play_one_session(
                &config,
                cli.rounds,
                &mut console,
                auto.as_mut(),
                &mut stats,
            ) => outcome,
        };
        match outcome {
            Ok(session) => println!("{session}"),
            Err(e) => {
                warn!("session ended early: {e:#}");
                println!("Connection lost or error: {e:#}");
                if !pause_before_retry(config.play.retry_delay(), &mut ctrl_c).await {
                    break;
                }
            }
        }
    }
    info!("shutdown signal received");

    if stats.rounds_played > 0 {
        println!("Overall: {stats}");
    }
    info!("LAN Blackjack Client stopped");
    Ok(())
}

/// Discovery, connect, rounds prompt and play for a single server.
async fn play_one_session(
    config: &ClientConfig,
    rounds: Option<u8>,
    console: &mut ConsoleSeat<tokio::io::BufReader<tokio::io::Stdin>, std::io::Stdout>,
    auto: Option<&mut AutoSeat>,
    stats: &mut ClientStats,
) -> anyhow::Result<ClientStats> {
    let server = {
        let listener = DiscoveryListener::bind(config.network.discovery_addr())
            .await
            .context("binding discovery socket")?;
        println!("Client started, listening for offer requests...");
        listener.next_offer().await?
    };
    println!(
        "Received offer from {} ({:?}), attempting to connect...",
        server.addr.ip(),
        server.server_name
    );

    let mut stream = connect(server.addr).await?;
    let rounds = match rounds {
        Some(n) => n,
        None => console.prompt_rounds().await.context("reading rounds to play")?,
    };

    let seat: &mut dyn PlayerSeat = match auto {
        Some(auto) => auto,
        None => console,
    };
    let session = play_session(&mut stream, &config.client.name, rounds, seat, stats).await?;

    // Best effort: the server closes its side after the linger anyway.
    let _ = stream.shutdown().await;
    Ok(session)
}
