//! The decision boundary between the round protocol and whoever is playing.
//!
//! The round player owns the socket; a [`PlayerSeat`] only sees hands and
//! answers "hit or stand?".  The console seat lives in the infrastructure
//! layer; [`AutoSeat`] is a fixed policy useful for unattended play and tests.

use async_trait::async_trait;
use blackjack_core::{Card, Decision, Hand, Outcome};

/// Whose hand a dealt card went into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOwner {
    Player,
    Dealer,
}

/// Something that can sit at the table and make decisions.
///
/// Only [`PlayerSeat::decide`] is required.  The notification hooks default
/// to no-ops.
#[async_trait]
pub trait PlayerSeat: Send {
    /// Returns [`Decision::Hit`] or [`Decision::Stand`] for the current hands.
    ///
    /// Called only while the player total is below 21 and at least three
    /// cards have been dealt.  Any decision other than `Hit` ends the turn.
    async fn decide(&mut self, player: &Hand, dealer: &Hand) -> Decision;

    /// A card was dealt face up.
    fn on_card(&mut self, _card: Card, _owner: CardOwner) {}

    /// The round ended.
    fn on_result(&mut self, _outcome: Outcome, _player: &Hand, _dealer: &Hand) {}
}

/// Dealer-style policy: hit below a threshold, otherwise stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSeat {
    pub stand_at: u32,
}

impl AutoSeat {
    pub const DEFAULT_STAND_AT: u32 = 17;

    pub fn new(stand_at: u32) -> Self {
        Self { stand_at }
    }
}

impl Default for AutoSeat {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STAND_AT)
    }
}

#[async_trait]
impl PlayerSeat for AutoSeat {
    async fn decide(&mut self, player: &Hand, _dealer: &Hand) -> Decision {
        if player.total() < self.stand_at {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }
}
