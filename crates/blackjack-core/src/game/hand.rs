//! An ordered collection of cards with a blackjack total.

use serde::{Deserialize, Serialize};

use super::card::Card;

/// Totals above this are bust.
pub const BLACKJACK: u32 = 21;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Sum of card values.
    pub fn total(&self) -> u32 {
        self.cards.iter().map(Card::value).sum()
    }

    pub fn is_bust(&self) -> bool {
        self.total() > BLACKJACK
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(ranks: &[u16]) -> Hand {
        ranks.iter().map(|&r| Card::new(r, 0).unwrap()).collect()
    }

    #[test]
    fn test_empty_hand_totals_zero() {
        let h = Hand::new();
        assert_eq!(h.total(), 0);
        assert!(!h.is_bust());
    }

    #[test]
    fn test_total_counts_ace_as_one_and_faces_as_ten() {
        assert_eq!(hand(&[1, 13]).total(), 11);
        assert_eq!(hand(&[11, 12, 1]).total(), 21);
        assert_eq!(hand(&[2, 3, 4]).total(), 9);
    }

    #[test]
    fn test_bust_iff_total_above_21() {
        for ranks in [&[10u16, 10, 1][..], &[10, 10, 2], &[5, 5], &[13, 12, 2]] {
            let h = hand(ranks);
            assert_eq!(h.is_bust(), h.total() > 21, "ranks {ranks:?}");
        }
        assert!(!hand(&[10, 10, 1]).is_bust());
        assert!(hand(&[10, 10, 2]).is_bust());
    }
}
