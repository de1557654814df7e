//! A single blackjack round: one deck, a player hand and a dealer hand.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::card::Card;
use super::deck::Deck;
use super::hand::Hand;
use super::GameError;

/// The dealer keeps drawing while the hand totals less than this.
pub const DEALER_STANDS_AT: u32 = 17;

/// Result of a finished round from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

/// Engine state for one round.
///
/// Once `finished` is set no further hits or stands are accepted.
#[derive(Debug, Clone)]
pub struct Round {
    deck: Deck,
    player: Hand,
    dealer: Hand,
    finished: bool,
}

impl Round {
    /// A round over a freshly shuffled 52-card deck.
    pub fn new() -> Self {
        Self::with_deck(Deck::new())
    }

    /// A round over a caller-supplied deck.
    pub fn with_deck(deck: Deck) -> Self {
        Self {
            deck,
            player: Hand::new(),
            dealer: Hand::new(),
            finished: false,
        }
    }

    /// Deals player, dealer, player, dealer.
    ///
    /// # Errors
    ///
    /// [`GameError::RoundAlreadyFinished`] after the round ended, or
    /// [`GameError::DeckExhausted`] if the deck runs dry.
    pub fn initial_deal(&mut self) -> Result<(), GameError> {
        self.ensure_open()?;
        for _ in 0..2 {
            let card = self.draw()?;
            self.player.add(card);
            let card = self.draw()?;
            self.dealer.add(card);
        }
        Ok(())
    }

    /// Draws one card into the player's hand.  A bust ends the round.
    ///
    /// # Errors
    ///
    /// [`GameError::RoundAlreadyFinished`] if the round already ended.
    pub fn player_hit(&mut self) -> Result<Card, GameError> {
        self.ensure_open()?;
        let card = self.draw()?;
        self.player.add(card);
        if self.player.is_bust() {
            trace!(total = self.player.total(), "player bust");
            self.finished = true;
        }
        Ok(card)
    }

    /// Runs the dealer's draw-to-17 policy and ends the round.
    ///
    /// # Errors
    ///
    /// [`GameError::RoundAlreadyFinished`] if the round already ended.
    pub fn player_stand(&mut self) -> Result<(), GameError> {
        self.ensure_open()?;
        while self.dealer.total() < DEALER_STANDS_AT {
            let card = self.draw()?;
            self.dealer.add(card);
        }
        self.finished = true;
        Ok(())
    }

    /// Player bust is checked before dealer bust, so a double bust is a loss.
    pub fn result(&self) -> Outcome {
        if self.player.is_bust() {
            return Outcome::Loss;
        }
        if self.dealer.is_bust() {
            return Outcome::Win;
        }
        match self.player.total().cmp(&self.dealer.total()) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn ensure_open(&self) -> Result<(), GameError> {
        if self.finished {
            Err(GameError::RoundAlreadyFinished)
        } else {
            Ok(())
        }
    }

    fn draw(&mut self) -> Result<Card, GameError> {
        self.deck.draw().ok_or(GameError::DeckExhausted)
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
