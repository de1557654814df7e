//! PlaySession: one connection to one server, from REQUEST to the last result.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use blackjack_core::{encode_request, Outcome, RequestMessage};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use super::play_round::play_round;
use super::seat::PlayerSeat;
use super::PlayError;

/// Running tally of round results.
///
/// The binary keeps one `ClientStats` for the whole process, so results from
/// sessions that ended in a disconnect are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    pub rounds_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl ClientStats {
    pub fn record(&mut self, outcome: Outcome) {
        self.rounds_played += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    /// Fraction of rounds won, `0.0` before any round is played.
    pub fn win_rate(&self) -> f64 {
        if self.rounds_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.rounds_played)
        }
    }
}

impl fmt::Display for ClientStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Finished playing {} rounds, win rate: {:.1}% ({} won, {} lost, {} tied)",
            self.rounds_played,
            self.win_rate() * 100.0,
            self.wins,
            self.losses,
            self.ties
        )
    }
}

/// Sends the REQUEST, then plays `rounds` rounds back to back.
///
/// Every finished round is recorded into `lifetime` immediately.  Returns the
/// tally for this session alone.
///
/// # Errors
///
/// Any [`PlayError`] ends the session; rounds already finished stay recorded
/// in `lifetime`.
pub async fn play_session<S, P>(
    stream: &mut S,
    client_name: &str,
    rounds: u8,
    seat: &mut P,
    lifetime: &mut ClientStats,
) -> Result<ClientStats, PlayError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    P: PlayerSeat + ?Sized,
{
    let request = encode_request(&RequestMessage {
        rounds,
        client_name: client_name.to_string(),
    })?;
    stream.write_all(&request).await?;
    info!("requested {rounds} round(s) as {client_name:?}");

    let mut session = ClientStats::default();
    for round_no in 1..=rounds {
        debug!(round_no, "round starting");
        let outcome = play_round(stream, seat).await?;
        session.record(outcome);
        lifetime.record(outcome);
    }
    Ok(session)
}

/// Waits `delay` before the next discovery attempt.
///
/// Returns `false` without waiting out the delay if `interrupt` finishes
/// first, e.g. a Ctrl-C future.
pub async fn pause_before_retry<F: Future>(delay: Duration, interrupt: F) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = interrupt => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::seat::AutoSeat;
    use blackjack_core::{
        decode_request, encode_payload, protocol::messages::REQUEST_SIZE, Card, PayloadMessage,
        ProtocolError,
    };
    use tokio::io::AsyncReadExt;

    /// Deals 10, 10, 10 then reveals a 7 and reports `outcome`; AutoSeat
    /// stands on 20, so no decision other than one Stand is expected.
    async fn serve_fixed_round(far: &mut tokio::io::DuplexStream, outcome: Outcome) {
        for rank in [10u16, 10, 10] {
            let pkt = encode_payload(&PayloadMessage::card(Card::new(rank, 0).unwrap()));
            far.write_all(&pkt).await.unwrap();
        }
        let mut decision = [0u8; 14];
        far.read_exact(&mut decision).await.unwrap();
        let pkt = encode_payload(&PayloadMessage::card(Card::new(7, 0).unwrap()));
        far.write_all(&pkt).await.unwrap();
        far.write_all(&encode_payload(&PayloadMessage::result(outcome)))
            .await
            .unwrap();
    }

    #[test]
    fn test_stats_win_rate_and_summary() {
        // Arrange
        let mut stats = ClientStats::default();

        // Act
        stats.record(Outcome::Win);
        stats.record(Outcome::Loss);
        stats.record(Outcome::Win);
        stats.record(Outcome::Tie);

        // Assert
        assert_eq!(stats.win_rate(), 0.5);
        assert_eq!(
            stats.to_string(),
            "Finished playing 4 rounds, win rate: 50.0% (2 won, 1 lost, 1 tied)"
        );
    }

    #[test]
    fn test_empty_stats_have_zero_win_rate() {
        assert_eq!(ClientStats::default().win_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_session_sends_request_first_and_counts_rounds() {
        // Arrange
        let (mut near, mut far) = tokio::io::duplex(1024);
        let server = tokio::spawn(async move {
            let mut buf = [0u8; REQUEST_SIZE];
            far.read_exact(&mut buf).await.unwrap();
            let request = decode_request(&buf).unwrap();
            serve_fixed_round(&mut far, Outcome::Win).await;
            serve_fixed_round(&mut far, Outcome::Tie).await;
            request
        });
        let mut lifetime = ClientStats::default();

        // Act
        let mut seat = AutoSeat::default();
        let session = play_session(&mut near, "Tester", 2, &mut seat, &mut lifetime)
            .await
            .unwrap();
        let request = server.await.unwrap();

        // Assert
        assert_eq!(request.rounds, 2);
        assert_eq!(request.client_name, "Tester");
        assert_eq!((session.wins, session.ties, session.rounds_played), (1, 1, 2));
        assert_eq!(lifetime, session);
    }

    #[tokio::test]
    async fn test_disconnect_keeps_finished_rounds_in_lifetime_stats() {
        let (mut near, mut far) = tokio::io::duplex(1024);
        let server = tokio::spawn(async move {
            let mut buf = [0u8; REQUEST_SIZE];
            far.read_exact(&mut buf).await.unwrap();
            serve_fixed_round(&mut far, Outcome::Win).await;
            // Hang up before the second round.
        });
        let mut lifetime = ClientStats {
            rounds_played: 3,
            wins: 2,
            losses: 1,
            ties: 0,
        };

        let mut seat = AutoSeat::default();
        let result = play_session(&mut near, "Tester", 3, &mut seat, &mut lifetime).await;
        server.await.unwrap();

        assert!(matches!(result, Err(PlayError::ServerDisconnected)));
        assert_eq!(lifetime.wins, 3);
        assert_eq!(lifetime.rounds_played, 4);
    }

    #[tokio::test]
    async fn test_retry_pause_elapses_without_interrupt() {
        let never = std::future::pending::<()>();
        let resumed = pause_before_retry(Duration::from_millis(10), never).await;
        assert!(resumed);
    }

    #[tokio::test]
    async fn test_interrupt_cuts_retry_pause_short() {
        // Arrange
        let started = std::time::Instant::now();

        // Act
        let resumed = tokio::time::timeout(
            Duration::from_secs(5),
            pause_before_retry(Duration::from_secs(60), std::future::ready(())),
        )
        .await
        .expect("interrupt must end the pause");

        // Assert
        assert!(!resumed);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_zero_rounds_is_rejected_before_sending() {
        let (mut near, _far) = tokio::io::duplex(64);
        let mut lifetime = ClientStats::default();

        let mut seat = AutoSeat::default();
        let result = play_session(&mut near, "Tester", 0, &mut seat, &mut lifetime).await;

        assert!(matches!(
            result,
            Err(PlayError::Protocol(ProtocolError::InvalidRequest(0)))
        ));
    }
}
