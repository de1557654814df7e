//! Console seat: renders the table as text and reads the human's answers.
//!
//! Generic over the input and output streams so tests can script a session
//! with in-memory buffers; the binary uses [`ConsoleSeat::stdio`].

use std::io::{self, Write};

use async_trait::async_trait;
use blackjack_core::{Card, Decision, Hand, Outcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::{debug, warn};

use crate::application::seat::{CardOwner, PlayerSeat};

/// A human at a terminal.
pub struct ConsoleSeat<R, W> {
    input: R,
    output: W,
}

impl ConsoleSeat<BufReader<Stdin>, io::Stdout> {
    /// A seat reading tokio's stdin and writing stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R, W> ConsoleSeat<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Asks how many rounds to play until the answer is 1–255.
    ///
    /// # Errors
    ///
    /// Returns an [`io::ErrorKind::UnexpectedEof`] error if input ends first.
    pub async fn prompt_rounds(&mut self) -> io::Result<u8> {
        loop {
            self.say(format_args!("How many rounds do you want to play? "));
            let line = self.read_line().await?;
            match line.trim().parse::<u8>() {
                Ok(n) if n > 0 => return Ok(n),
                _ => self.say(format_args!("Please enter a number from 1 to 255.\n")),
            }
        }
    }

    async fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line)
    }

    fn say(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(e) = self.output.write_fmt(args).and_then(|()| self.output.flush()) {
            debug!("console write failed: {e}");
        }
    }
}

fn render(hand: &Hand) -> String {
    hand.cards()
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl<R, W> PlayerSeat for ConsoleSeat<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn decide(&mut self, player: &Hand, dealer: &Hand) -> Decision {
        loop {
            self.say(format_args!(
                "Your hand: {} ({}) | Dealer shows: {}\nHit or stand? [h/s] ",
                render(player),
                player.total(),
                render(dealer)
            ));
            let line = match self.read_line().await {
                Ok(line) => line,
                Err(e) => {
                    warn!("no answer from console ({e}); standing");
                    return Decision::Stand;
                }
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "h" | "hit" => return Decision::Hit,
                "s" | "stand" => return Decision::Stand,
                _ => self.say(format_args!("Type h to hit or s to stand.\n")),
            }
        }
    }

    fn on_card(&mut self, card: Card, owner: CardOwner) {
        match owner {
            CardOwner::Player => self.say(format_args!("You were dealt {card}\n")),
            CardOwner::Dealer => self.say(format_args!("Dealer draws {card}\n")),
        }
    }

    fn on_result(&mut self, outcome: Outcome, player: &Hand, dealer: &Hand) {
        let verdict = match outcome {
            Outcome::Win => "You win!",
            Outcome::Loss => "You lose.",
            Outcome::Tie => "It's a tie.",
        };
        self.say(format_args!(
            "{verdict} You: {} ({}), dealer: {} ({})\n",
            render(player),
            player.total(),
            render(dealer),
            dealer.total()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(input: &'static str) -> ConsoleSeat<&'static [u8], Vec<u8>> {
        ConsoleSeat::new(input.as_bytes(), Vec::new())
    }

    fn hand(cards: &[(u16, u8)]) -> Hand {
        cards.iter().map(|&(r, s)| Card::new(r, s).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_prompt_rounds_retries_until_valid() {
        // Arrange
        let mut seat = seat("zero\n0\n300\n 7 \n");

        // Act
        let rounds = seat.prompt_rounds().await.unwrap();

        // Assert
        assert_eq!(rounds, 7);
        let out = String::from_utf8(seat.into_output()).unwrap();
        assert_eq!(out.matches("Please enter a number").count(), 3);
    }

    #[tokio::test]
    async fn test_prompt_rounds_on_closed_input_is_eof() {
        let mut seat = seat("");
        let err = seat.prompt_rounds().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_decide_parses_hit_and_stand() {
        let player = hand(&[(10, 0), (5, 1)]);
        let dealer = hand(&[(9, 2)]);
        let mut seat = seat("maybe\nH\nstand\n");

        assert_eq!(seat.decide(&player, &dealer).await, Decision::Hit);
        assert_eq!(seat.decide(&player, &dealer).await, Decision::Stand);

        let out = String::from_utf8(seat.into_output()).unwrap();
        assert!(out.contains("Your hand: 10♥ 5♦ (15) | Dealer shows: 9♣"), "{out}");
        assert!(out.contains("Type h to hit or s to stand."));
    }

    #[tokio::test]
    async fn test_decide_stands_when_input_closes() {
        let mut seat = seat("");
        let decision = seat.decide(&hand(&[(2, 0), (3, 0)]), &hand(&[(4, 0)])).await;
        assert_eq!(decision, Decision::Stand);
    }

    #[test]
    fn test_notifications_render_cards_with_suit_symbols() {
        let mut seat = seat("");

        seat.on_card(Card::new(1, 0).unwrap(), CardOwner::Player);
        seat.on_card(Card::new(13, 3).unwrap(), CardOwner::Dealer);
        seat.on_result(
            Outcome::Tie,
            &hand(&[(10, 1), (7, 2)]),
            &hand(&[(13, 3), (7, 0)]),
        );

        let out = String::from_utf8(seat.into_output()).unwrap();
        assert_eq!(
            out,
            "You were dealt A♥\nDealer draws K♠\nIt's a tie. You: 10♦ 7♣ (17), dealer: K♠ 7♥ (17)\n"
        );
    }
}
