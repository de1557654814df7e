//! Client-side round player.
//!
//! The server never labels its cards, so the client works out whose card is
//! whose from the order they arrive in:
//!
//! ```text
//! card 1, 2          -> player
//! card 3             -> dealer (upcard)
//! later, not stood   -> player (the card answering our "Hittt")
//! later, stood       -> dealer (hidden card, then the dealer's draws)
//! rank 0             -> terminal result
//! ```
//!
//! A decision is due once three cards are down, the player has not stood and
//! the player total is below 21.  Reaching 21 or more counts as standing,
//! matching the server, which stops reading decisions at that point.

use blackjack_core::{Card, Decision, Hand, Outcome, PayloadMessage};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::seat::{CardOwner, PlayerSeat};
use super::{read_payload, write_payload, PlayError};

/// Cards in the opening deal that the client can see.
const OPENING_CARDS: usize = 3;

/// A player total at or above this ends the player's turn.
const TURN_ENDS_AT: u32 = 21;

/// What the client knows about the round in progress.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    player: Hand,
    dealer: Hand,
    dealt: usize,
    stood: bool,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a dealt card under its owner and returns that owner.
    pub fn receive(&mut self, card: Card) -> CardOwner {
        let owner = match self.dealt {
            0 | 1 => CardOwner::Player,
            2 => CardOwner::Dealer,
            _ if self.stood => CardOwner::Dealer,
            _ => CardOwner::Player,
        };
        self.dealt += 1;
        match owner {
            CardOwner::Player => {
                self.player.add(card);
                if self.dealt > OPENING_CARDS && self.player.total() >= TURN_ENDS_AT {
                    self.stood = true;
                }
            }
            CardOwner::Dealer => self.dealer.add(card),
        }
        owner
    }

    /// Whether the server is now waiting for a decision.
    pub fn needs_decision(&self) -> bool {
        !self.stood && self.dealt >= OPENING_CARDS && self.player.total() < TURN_ENDS_AT
    }

    /// Records a decision that is about to be sent.
    pub fn decided(&mut self, decision: Decision) {
        if decision != Decision::Hit {
            self.stood = true;
        }
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    pub fn has_stood(&self) -> bool {
        self.stood
    }
}

/// Plays one round: reads packets until the terminal one, asking `seat`
/// whenever a decision is due.
///
/// # Errors
///
/// [`PlayError::ServerDisconnected`] if the connection drops mid-round,
/// [`PlayError::Protocol`] for a malformed or foreign packet,
/// [`PlayError::Game`] for an impossible card and
/// [`PlayError::MissingResult`] for a terminal packet without a result.
pub async fn play_round<S, P>(stream: &mut S, seat: &mut P) -> Result<Outcome, PlayError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    P: PlayerSeat + ?Sized,
{
    let mut table = TableState::new();
    loop {
        let msg = read_payload(stream).await?;
        if msg.is_terminal() {
            let outcome = msg.result.outcome().ok_or(PlayError::MissingResult)?;
            debug!(
                ?outcome,
                player_total = table.player_hand().total(),
                dealer_total = table.dealer_hand().total(),
                "round over"
            );
            seat.on_result(outcome, table.player_hand(), table.dealer_hand());
            return Ok(outcome);
        }

        let card = Card::new(msg.rank, msg.suit)?;
        let owner = table.receive(card);
        debug!(%card, ?owner, "card dealt");
        seat.on_card(card, owner);

        if table.needs_decision() {
            let decision = match seat.decide(table.player_hand(), table.dealer_hand()).await {
                Decision::Hit => Decision::Hit,
                _ => Decision::Stand,
            };
            table.decided(decision);
            debug!(%decision, total = table.player_hand().total(), "decision sent");
            write_payload(stream, &PayloadMessage::decision(decision)).await?;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
