//! Playing cards and their blackjack value.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::GameError;

/// Card suit, encoded 0–3 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

impl TryFrom<u8> for Suit {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(Suit::Hearts),
            1 => Ok(Suit::Diamonds),
            2 => Ok(Suit::Clubs),
            3 => Ok(Suit::Spades),
            _ => Err(()),
        }
    }
}

/// A single playing card.  Rank 1 is the ace, 11/12/13 are J/Q/K.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 13;

    /// Builds a card from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidCard`] if `rank` is outside 1–13 or `suit`
    /// is outside 0–3.
    pub fn new(rank: u16, suit: u8) -> Result<Self, GameError> {
        let invalid = GameError::InvalidCard { rank, suit };
        let rank = u8::try_from(rank).map_err(|_| invalid.clone())?;
        if !(Self::MIN_RANK..=Self::MAX_RANK).contains(&rank) {
            return Err(invalid);
        }
        let suit = Suit::try_from(suit).map_err(|_| invalid)?;
        Ok(Self { rank, suit })
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Blackjack value: ace 1, face cards 10, otherwise the rank.
    pub fn value(&self) -> u32 {
        match self.rank {
            1 => 1,
            r if r >= 11 => 10,
            r => u32::from(r),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            1 => write!(f, "A")?,
            11 => write!(f, "J")?,
            12 => write!(f, "Q")?,
            13 => write!(f, "K")?,
            r => write!(f, "{r}")?,
        }
        write!(f, "{}", self.suit.symbol())
    }
}
