//! Blackjack game engine: cards, deck, hands and the per-round rules.
//!
//! Table rules are fixed: one 52-card deck per round, aces always count 1,
//! face cards count 10, the dealer draws while below 17.

pub mod card;
pub mod deck;
pub mod hand;
pub mod round;

use thiserror::Error;

/// Errors raised by the game engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// A hit or stand was attempted after the round already ended.
    #[error("round already finished")]
    RoundAlreadyFinished,

    /// A rank outside 1–13 or a suit outside 0–3.
    #[error("invalid card: rank {rank}, suit {suit}")]
    InvalidCard { rank: u16, suit: u8 },

    /// The deck ran out of cards.  Never happens with 52 cards under these
    /// table rules; only hand-built decks can trigger it.
    #[error("deck is empty")]
    DeckExhausted,
}
