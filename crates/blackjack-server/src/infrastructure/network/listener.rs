//! TCP accept loop.
//!
//! Every accepted connection gets its own Tokio task running
//! [`serve_session`].  Sessions share no game state, so a slow client only
//! stalls its own task.  Shutdown stops accepting; sessions already running
//! are drained to completion before [`GameListener::run`] returns.

use std::net::SocketAddr;
use std::time::Duration;

use blackjack_core::Round;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::NetworkError;
use crate::application::serve_session::{serve_session, SessionOptions};
use crate::application::SessionError;

/// First pause after a failed `accept`; doubles per consecutive failure.
const ACCEPT_BACKOFF_BASE: Duration = Duration::from_millis(50);
/// Longest pause between `accept` retries.
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Pause before the next `accept` after `failures` consecutive errors.
fn accept_backoff(failures: u32) -> Duration {
    let factor = 1u32 << failures.saturating_sub(1).min(5);
    (ACCEPT_BACKOFF_BASE * factor).min(ACCEPT_BACKOFF_MAX)
}

/// Listening socket plus the options handed to every session.
pub struct GameListener {
    listener: TcpListener,
    options: SessionOptions,
}

impl GameListener {
    /// Binds the TCP listener.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::BindFailed`] if `addr` cannot be bound.
    pub async fn bind(addr: SocketAddr, options: SessionOptions) -> Result<Self, NetworkError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| NetworkError::BindFailed { addr, source })?;
        Ok(Self { listener, options })
    }

    /// The bound address; useful when binding port 0.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Io`] if the OS cannot report the address.
    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until `shutdown` becomes `true` or its sender is
    /// dropped, then waits for in-flight sessions to end.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut sessions = JoinSet::new();
        let mut accept_failures = 0u32;
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        accept_failures = 0;
                        info!("client connected from {peer}");
                        let options = self.options.clone();
                        sessions.spawn(
                            handle_connection(stream, peer, options)
                                .instrument(info_span!("session", %peer)),
                        );
                    }
                    Err(e) => {
                        // Errors such as EMFILE persist; back off instead of spinning.
                        accept_failures = accept_failures.saturating_add(1);
                        let pause = accept_backoff(accept_failures);
                        error!("accept failed: {e}; retrying in {pause:?}");
                        tokio::select! {
                            _ = time::sleep(pause) => {}
                            _ = shutdown.changed() => {}
                        }
                    }
                },
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = joined {
                        error!("session task failed: {e}");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        info!("no longer accepting connections");

        if !sessions.is_empty() {
            debug!("waiting for {} session(s) to finish", sessions.len());
        }
        while let Some(joined) = sessions.join_next().await {
            if let Err(e) = joined {
                error!("session task failed: {e}");
            }
        }
    }
}

/// Runs one session and closes the socket whatever the outcome.
async fn handle_connection(mut stream: TcpStream, peer: SocketAddr, options: SessionOptions) {
    if let Err(e) = stream.set_nodelay(true) {
        warn!("could not disable Nagle for {peer}: {e}");
    }

    match serve_session(&mut stream, &options, Round::new).await {
        Ok(summary) => info!(
            "session with {} complete: {} round(s)",
            summary.client_name, summary.rounds_played
        ),
        Err(SessionError::PeerDisconnected) => warn!("client {peer} disconnected abruptly"),
        Err(e @ SessionError::Game(_)) => error!("round aborted by engine error: {e}"),
        Err(e) => warn!("session with {peer} aborted: {e}"),
    }

    // Best effort: the peer may already be gone.
    let _ = stream.shutdown().await;
    info!("socket for {peer} closed");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
