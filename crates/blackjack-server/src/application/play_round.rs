//! Server-side round state machine.
//!
//! ```text
//! Dealing ──► PlayerTurn ──► DealerReveal ──► ResultSent
//!               │    ▲
//!               └────┘  (hit below 21)
//! ```
//!
//! - `Dealing`: deal P1, D1, P2, D2 and send P1, P2, D1.  D2 stays hidden.
//! - `PlayerTurn`: read one PAYLOAD.  `Hittt` draws and sends exactly one
//!   card; a total of 21 or more ends the turn without another read.  Any
//!   other decision is a stand.
//!   Hitting to exactly 21 stands, so the dealer then draws to 17 as usual;
//!   peers that expect only the hidden card after a 21 will see more cards.
//! - `DealerReveal`: send every dealer card after the first, in draw order.
//! - `ResultSent`: send the rank-0 terminal packet with the result code.

use blackjack_core::{Decision, Outcome, PayloadMessage, Round};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::{read_payload, write_payload, SessionError};

/// A player total at or above this ends the player's turn.
const TURN_ENDS_AT: u32 = 21;

/// States of one round as seen from the dealer's side of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Dealing,
    PlayerTurn,
    DealerReveal,
    ResultSent,
}

/// Plays `round` to completion against the peer on `stream`.
///
/// Returns the outcome after the terminal packet has been written.  On error
/// nothing further is sent for this round.
///
/// # Errors
///
/// [`SessionError::PeerDisconnected`] if the peer goes away mid-round,
/// [`SessionError::Protocol`] if the peer sends something other than a valid
/// PAYLOAD, and [`SessionError::Game`] if the engine rejects a move.
pub async fn play_round<S>(stream: &mut S, mut round: Round) -> Result<Outcome, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut state = RoundState::Dealing;
    loop {
        state = match state {
            RoundState::Dealing => {
                round.initial_deal()?;
                let player = round.player_hand().cards();
                let dealer = round.dealer_hand().cards();
                for card in [player[0], player[1], dealer[0]] {
                    write_payload(stream, &PayloadMessage::card(card)).await?;
                }
                debug!(
                    player_total = round.player_hand().total(),
                    upcard = %dealer[0],
                    "initial deal sent"
                );
                RoundState::PlayerTurn
            }

            RoundState::PlayerTurn => {
                let msg = read_payload(stream).await?;
                debug!(decision = %msg.decision, "player decision received");
                match msg.decision {
                    Decision::Hit => {
                        let card = round.player_hit()?;
                        write_payload(stream, &PayloadMessage::card(card)).await?;
                        let total = round.player_hand().total();
                        debug!(%card, total, "player hit");
                        if total < TURN_ENDS_AT {
                            RoundState::PlayerTurn
                        } else {
                            // Bust already finished the round; exactly 21 is an implicit stand.
                            if !round.is_finished() {
                                round.player_stand()?;
                            }
                            RoundState::DealerReveal
                        }
                    }
                    _ => {
                        round.player_stand()?;
                        RoundState::DealerReveal
                    }
                }
            }

            RoundState::DealerReveal => {
                for &card in &round.dealer_hand().cards()[1..] {
                    write_payload(stream, &PayloadMessage::card(card)).await?;
                }
                RoundState::ResultSent
            }

            RoundState::ResultSent => {
                let outcome = round.result();
                write_payload(stream, &PayloadMessage::result(outcome)).await?;
                debug!(
                    ?outcome,
                    player_total = round.player_hand().total(),
                    dealer_total = round.dealer_hand().total(),
                    "round result sent"
                );
                return Ok(outcome);
            }
        };
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_core::{
        decode_payload, encode_payload, protocol::messages::PAYLOAD_SIZE, Card, Deck,
        ProtocolError, ResultCode,
    };
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio_test::io::Builder;

    /// Builds a round whose deck yields `ranks` (all hearts) in draw order.
    fn rigged(ranks: &[u16]) -> Round {
        let cards = ranks
            .iter()
            .rev()
            .map(|&r| Card::new(r, 0).unwrap())
            .collect();
        Round::with_deck(Deck::from_cards(cards))
    }

    fn card_bytes(rank: u16) -> [u8; PAYLOAD_SIZE] {
        encode_payload(&PayloadMessage::card(Card::new(rank, 0).unwrap()))
    }

    fn decision_bytes(decision: Decision) -> [u8; PAYLOAD_SIZE] {
        encode_payload(&PayloadMessage::decision(decision))
    }

    fn result_bytes(outcome: Outcome) -> [u8; PAYLOAD_SIZE] {
        encode_payload(&PayloadMessage::result(outcome))
    }

    #[tokio::test]
    async fn test_stand_reveals_hidden_card_and_dealer_hits_then_result() {
        // Arrange: P 10+9, dealer 3+4 draws 5, 2, 6 to reach 20.
        let round = rigged(&[10, 3, 9, 4, 5, 2, 6]);
        let mut peer = Builder::new()
            .write(&card_bytes(10))
            .write(&card_bytes(9))
            .write(&card_bytes(3))
            .read(&decision_bytes(Decision::Stand))
            .write(&card_bytes(4))
            .write(&card_bytes(5))
            .write(&card_bytes(2))
            .write(&card_bytes(6))
            .write(&result_bytes(Outcome::Loss))
            .build();

        // Act
        let outcome = play_round(&mut peer, round).await.unwrap();

        // Assert
        assert_eq!(outcome, Outcome::Loss);
    }

    #[tokio::test]
    async fn test_each_hit_sends_exactly_one_card_before_next_read() {
        // P 2+3, hits 4 then 5 (total 14), then stands; dealer 10+8.
        let round = rigged(&[2, 10, 3, 8, 4, 5]);
        let mut peer = Builder::new()
            .write(&card_bytes(2))
            .write(&card_bytes(3))
            .write(&card_bytes(10))
            .read(&decision_bytes(Decision::Hit))
            .write(&card_bytes(4))
            .read(&decision_bytes(Decision::Hit))
            .write(&card_bytes(5))
            .read(&decision_bytes(Decision::Stand))
            .write(&card_bytes(8))
            .write(&result_bytes(Outcome::Loss))
            .build();

        let outcome = play_round(&mut peer, round).await.unwrap();

        assert_eq!(outcome, Outcome::Loss);
    }

    #[tokio::test]
    async fn test_hit_to_exactly_21_goes_straight_to_dealer_reveal() {
        // P 10+9 hits a 2 for 21; no further decision is read.  Dealer
        // 10+7 stands on 17.
        let round = rigged(&[10, 10, 9, 7, 2]);
        let mut peer = Builder::new()
            .write(&card_bytes(10))
            .write(&card_bytes(9))
            .write(&card_bytes(10))
            .read(&decision_bytes(Decision::Hit))
            .write(&card_bytes(2))
            .write(&card_bytes(7))
            .write(&result_bytes(Outcome::Win))
            .build();

        let outcome = play_round(&mut peer, round).await.unwrap();

        assert_eq!(outcome, Outcome::Win);
    }

    #[tokio::test]
    async fn test_implicit_stand_at_21_still_runs_dealer_policy() {
        // P 10+9 hits a 2 for 21; dealer 5+6 must draw the queen (21) and tie.
        let round = rigged(&[10, 5, 9, 6, 2, 12]);
        let mut peer = Builder::new()
            .write(&card_bytes(10))
            .write(&card_bytes(9))
            .write(&card_bytes(5))
            .read(&decision_bytes(Decision::Hit))
            .write(&card_bytes(2))
            .write(&card_bytes(6))
            .write(&card_bytes(12))
            .write(&result_bytes(Outcome::Tie))
            .build();

        let outcome = play_round(&mut peer, round).await.unwrap();

        assert_eq!(outcome, Outcome::Tie);
    }

    #[tokio::test]
    async fn test_bust_reveals_only_hidden_card_and_loses() {
        // P 10+9 hits a king; dealer 2+3 never plays.
        let round = rigged(&[10, 2, 9, 3, 13]);
        let mut peer = Builder::new()
            .write(&card_bytes(10))
            .write(&card_bytes(9))
            .write(&card_bytes(2))
            .read(&decision_bytes(Decision::Hit))
            .write(&card_bytes(13))
            .write(&card_bytes(3))
            .write(&result_bytes(Outcome::Loss))
            .build();

        let outcome = play_round(&mut peer, round).await.unwrap();

        assert_eq!(outcome, Outcome::Loss);
    }

    #[tokio::test]
    async fn test_unrecognised_decision_is_treated_as_stand() {
        let round = rigged(&[10, 10, 8, 8]);
        let mut peer = Builder::new()
            .write(&card_bytes(10))
            .write(&card_bytes(8))
            .write(&card_bytes(10))
            .read(&decision_bytes(Decision::Other(*b"maybe")))
            .write(&card_bytes(8))
            .write(&result_bytes(Outcome::Tie))
            .build();

        let outcome = play_round(&mut peer, round).await.unwrap();

        assert_eq!(outcome, Outcome::Tie);
    }

    #[tokio::test]
    async fn test_peer_closing_during_player_turn_aborts_round() {
        // Arrange: the client reads the three opening cards and hangs up
        let (mut server, mut client) = tokio::io::duplex(256);
        let client_task = tokio::spawn(async move {
            let mut buf = [0u8; PAYLOAD_SIZE * 3];
            client.read_exact(&mut buf).await.unwrap();
        });

        // Act
        let result = play_round(&mut server, rigged(&[10, 10, 5, 5])).await;
        client_task.await.unwrap();

        // Assert
        assert!(matches!(result, Err(SessionError::PeerDisconnected)));
    }

    #[tokio::test]
    async fn test_foreign_packet_during_player_turn_aborts_round() {
        let (mut server, mut client) = tokio::io::duplex(256);
        let client_task = tokio::spawn(async move {
            let mut buf = [0u8; PAYLOAD_SIZE * 3];
            client.read_exact(&mut buf).await.unwrap();
            let mut bogus = decision_bytes(Decision::Hit);
            bogus[4] = 0x03;
            client.write_all(&bogus).await.unwrap();
            // Nothing else may arrive for this round.
            let mut rest = Vec::new();
            client.read_to_end(&mut rest).await.unwrap();
            rest
        });

        let result = play_round(&mut server, rigged(&[10, 10, 5, 5])).await;
        drop(server);
        let trailing = client_task.await.unwrap();

        assert!(matches!(
            result,
            Err(SessionError::Protocol(ProtocolError::ProtocolMismatch { .. }))
        ));
        assert!(trailing.is_empty(), "no packets may follow an aborted round");
    }

    #[tokio::test]
    async fn test_opening_cards_decode_in_player_player_dealer_order() {
        let (mut server, mut client) = tokio::io::duplex(1024);
        let client_task = tokio::spawn(async move {
            let mut ranks = Vec::new();
            for _ in 0..3 {
                let mut buf = [0u8; PAYLOAD_SIZE];
                client.read_exact(&mut buf).await.unwrap();
                let msg = decode_payload(&buf).unwrap();
                assert_eq!(msg.result, ResultCode::NotOver);
                ranks.push(msg.rank);
            }
            client
                .write_all(&decision_bytes(Decision::Stand))
                .await
                .unwrap();
            let mut rest = Vec::new();
            loop {
                let mut buf = [0u8; PAYLOAD_SIZE];
                client.read_exact(&mut buf).await.unwrap();
                let msg = decode_payload(&buf).unwrap();
                rest.push(msg);
                if msg.is_terminal() {
                    break;
                }
            }
            (ranks, rest)
        });

        // Draw order P1=4, D1=11, P2=6, D2=12
        play_round(&mut server, rigged(&[4, 11, 6, 12])).await.unwrap();
        let (ranks, rest) = client_task.await.unwrap();

        assert_eq!(ranks, vec![4, 6, 11]);
        assert_eq!(rest.len(), 2, "hidden card then terminal packet");
        assert_eq!(rest[0].rank, 12);
        assert_eq!(rest[1].result, ResultCode::Loss);
        assert_eq!((rest[1].rank, rest[1].suit), (0, 0));
    }
}
