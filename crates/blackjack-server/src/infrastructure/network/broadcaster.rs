//! UDP offer broadcaster.
//!
//! Sends one OFFER packet to the configured broadcast address every
//! `interval` for as long as the server runs.  The OFFER carries the TCP port
//! that clients should connect to.  This task is the only writer on the
//! broadcast socket.

use std::net::SocketAddr;
use std::time::Duration;

use blackjack_core::{encode_offer, protocol::messages::OFFER_SIZE, OfferMessage};
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::NetworkError;

/// Shortest gap between offers; `tokio::time::interval` rejects a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Settings for the offer broadcaster.
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Destination of every OFFER, normally `255.255.255.255:<discovery port>`.
    pub target: SocketAddr,
    /// Time between consecutive offers.
    pub interval: Duration,
    /// TCP port advertised in the OFFER.
    pub tcp_port: u16,
    /// Server name advertised in the OFFER.
    pub server_name: String,
}

/// Owns the broadcast socket and the pre-encoded OFFER packet.
pub struct OfferBroadcaster {
    socket: UdpSocket,
    target: SocketAddr,
    interval: Duration,
    packet: [u8; OFFER_SIZE],
}

impl OfferBroadcaster {
    /// Binds an ephemeral UDP socket with `SO_BROADCAST` enabled.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BindFailed`] if the socket cannot be bound and
    /// [`NetworkError::Io`] if broadcast cannot be enabled.
    pub async fn bind(config: &BroadcastConfig) -> Result<Self, NetworkError> {
        let addr: SocketAddr = SocketAddr::from(([0, 0, 0, 0], 0));
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| NetworkError::BindFailed { addr, source })?;
        socket.set_broadcast(true)?;

        let packet = encode_offer(&OfferMessage {
            tcp_port: config.tcp_port,
            server_name: config.server_name.clone(),
        });

        Ok(Self {
            socket,
            target: config.target,
            interval: config.interval.max(MIN_INTERVAL),
            packet,
        })
    }

    /// Sends offers until `shutdown` becomes `true` or its sender is dropped.
    ///
    /// Send failures are logged and retried on the next tick; they never stop
    /// the broadcaster.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "sending offers to {} every {:?}",
            self.target, self.interval
        );
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    match self.socket.send_to(&self.packet, self.target).await {
                        Ok(_) => debug!("offer sent to {}", self.target),
                        Err(e) => warn!("failed to send offer to {}: {e}", self.target),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("offer broadcaster stopped");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
