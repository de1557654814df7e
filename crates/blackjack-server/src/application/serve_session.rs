//! ServeSession: negotiates a session and plays its rounds serially.
//!
//! A session is one TCP connection.  The client's first packet is a REQUEST
//! naming itself and the number of rounds; every round then runs to its
//! terminal packet before the next one begins.

use std::time::Duration;

use blackjack_core::{
    decode_request, protocol::messages::REQUEST_SIZE, Outcome, RequestMessage, Round,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{debug, info};

use super::play_round::play_round;
use super::SessionError;

/// Timing knobs for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Pause between the terminal packet of one round and the next deal.
    pub round_pause: Duration,
    /// How long to keep the connection open after the last round.
    pub linger: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            round_pause: Duration::from_millis(100),
            linger: Duration::from_millis(1500),
        }
    }
}

/// Tally of a completed session, from the player's point of view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub client_name: String,
    pub rounds_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl SessionSummary {
    fn record(&mut self, outcome: Outcome) {
        self.rounds_played += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }
}

/// Reads the REQUEST packet that opens every session.
///
/// # Errors
///
/// [`SessionError::PeerDisconnected`] if the connection closes first, or
/// [`SessionError::Protocol`] if the packet is malformed, foreign, or asks
/// for zero rounds.
pub async fn read_request<S>(stream: &mut S) -> Result<RequestMessage, SessionError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = [0u8; REQUEST_SIZE];
    stream.read_exact(&mut buf).await?;
    Ok(decode_request(&buf)?)
}

/// Serves one connection: REQUEST, then `rounds` rounds, then the linger.
///
/// `new_round` supplies a fresh [`Round`] for every round played; production
/// passes [`Round::new`], tests pass rigged decks.
///
/// # Errors
///
/// Any [`SessionError`] from the request or a round ends the session
/// immediately; remaining rounds are not played.
pub async fn serve_session<S, F>(
    stream: &mut S,
    options: &SessionOptions,
    mut new_round: F,
) -> Result<SessionSummary, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FnMut() -> Round,
{
    let request = read_request(stream).await?;
    info!(
        "starting {} round(s) with {}",
        request.rounds, request.client_name
    );

    let mut summary = SessionSummary {
        client_name: request.client_name,
        ..Default::default()
    };

    for round_no in 1..=request.rounds {
        let outcome = play_round(stream, new_round()).await?;
        debug!(round_no, ?outcome, "round complete");
        summary.record(outcome);

        if round_no < request.rounds && !options.round_pause.is_zero() {
            tokio::time::sleep(options.round_pause).await;
        }
    }

    info!(
        "finished {} round(s) with {} ({}W/{}L/{}T)",
        summary.rounds_played, summary.client_name, summary.wins, summary.losses, summary.ties
    );
    if !options.linger.is_zero() {
        tokio::time::sleep(options.linger).await;
    }
    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
