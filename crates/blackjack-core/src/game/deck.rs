//! The 52-card deck owned by a single round.

use rand::seq::SliceRandom;
use rand::Rng;

use super::card::{Card, Suit};

/// An ordered stack of cards.  Drawing takes from the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub const FULL_SIZE: usize = 52;

    /// A fresh deck shuffled with the thread-local RNG.
    pub fn new() -> Self {
        Self::shuffled_with(&mut rand::thread_rng())
    }

    /// A fresh deck shuffled with the given RNG.  Seeded RNGs give
    /// reproducible decks.
    pub fn shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(rng);
        deck
    }

    /// All 52 distinct cards, suit by suit, ace to king.
    pub fn ordered() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| {
                (Card::MIN_RANK..=Card::MAX_RANK).filter_map(move |rank| {
                    Card::new(u16::from(rank), suit as u8).ok()
                })
            })
            .collect();
        Self { cards }
    }

    /// A deck holding exactly `cards`; the last element is drawn first.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Removes and returns the last card, or `None` when empty.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
