//! All LAN Blackjack packet types.
//!
//! Every packet starts with the 4-byte magic cookie and a 1-byte type tag.
//! Field order and widths are a compatibility contract shared by both peers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::card::Card;
use crate::game::round::Outcome;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Fixed 32-bit constant identifying valid protocol traffic.
pub const MAGIC_COOKIE: u32 = 0xABCD_DCBA;

/// Width of the null-padded name field in OFFER and REQUEST packets.
pub const NAME_FIELD_LEN: usize = 32;

/// Width of the decision field in PAYLOAD packets.
pub const DECISION_LEN: usize = 5;

/// `[cookie:4][type:1][tcp_port:2][name:32]`
pub const OFFER_SIZE: usize = 4 + 1 + 2 + NAME_FIELD_LEN;

/// `[cookie:4][type:1][rounds:1][name:32]`
pub const REQUEST_SIZE: usize = 4 + 1 + 1 + NAME_FIELD_LEN;

/// `[cookie:4][type:1][decision:5][result:1][rank:2][suit:1]`
pub const PAYLOAD_SIZE: usize = 4 + 1 + DECISION_LEN + 1 + 2 + 1;

/// Decision bytes sent by a client that wants another card.
pub const HIT_BYTES: [u8; DECISION_LEN] = *b"Hittt";

/// Decision bytes sent by a client that is done drawing.
pub const STAND_BYTES: [u8; DECISION_LEN] = *b"Stand";

// ── Message type codes ────────────────────────────────────────────────────────

/// Type tag carried in byte 4 of every packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    /// Server → client UDP broadcast.
    Offer = 0x02,
    /// Client → server, first packet on a TCP connection.
    Request = 0x03,
    /// Both directions during round play.
    Payload = 0x04,
}

impl TryFrom<u8> for MessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x02 => Ok(MessageType::Offer),
            0x03 => Ok(MessageType::Request),
            0x04 => Ok(MessageType::Payload),
            _ => Err(()),
        }
    }
}

// ── Result codes ──────────────────────────────────────────────────────────────

/// Result byte of a PAYLOAD packet, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResultCode {
    NotOver = 0x00,
    Tie = 0x01,
    Loss = 0x02,
    Win = 0x03,
}

impl TryFrom<u8> for ResultCode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x00 => Ok(ResultCode::NotOver),
            0x01 => Ok(ResultCode::Tie),
            0x02 => Ok(ResultCode::Loss),
            0x03 => Ok(ResultCode::Win),
            _ => Err(()),
        }
    }
}

impl From<Outcome> for ResultCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => ResultCode::Win,
            Outcome::Loss => ResultCode::Loss,
            Outcome::Tie => ResultCode::Tie,
        }
    }
}

impl ResultCode {
    /// Returns the finished-round outcome, or `None` for [`ResultCode::NotOver`].
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            ResultCode::NotOver => None,
            ResultCode::Tie => Some(Outcome::Tie),
            ResultCode::Loss => Some(Outcome::Loss),
            ResultCode::Win => Some(Outcome::Win),
        }
    }
}

// ── Decisions ─────────────────────────────────────────────────────────────────

/// The 5-byte decision field of a PAYLOAD packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// `"Hittt"` – the player wants another card.
    Hit,
    /// `"Stand"` – the player is done drawing.
    Stand,
    /// All-zero; used by the server, which never decides anything.
    Empty,
    /// Any other byte pattern.  Servers treat this as a stand.
    Other([u8; DECISION_LEN]),
}

impl Decision {
    /// Returns the raw wire bytes for this decision.
    pub fn to_bytes(self) -> [u8; DECISION_LEN] {
        match self {
            Decision::Hit => HIT_BYTES,
            Decision::Stand => STAND_BYTES,
            Decision::Empty => [0u8; DECISION_LEN],
            Decision::Other(raw) => raw,
        }
    }

    /// Classifies a raw decision field.
    pub fn from_bytes(raw: [u8; DECISION_LEN]) -> Self {
        match raw {
            HIT_BYTES => Decision::Hit,
            STAND_BYTES => Decision::Stand,
            [0, 0, 0, 0, 0] => Decision::Empty,
            other => Decision::Other(other),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Hit => write!(f, "hit"),
            Decision::Stand => write!(f, "stand"),
            Decision::Empty => write!(f, "none"),
            Decision::Other(raw) => write!(f, "unknown({raw:02X?})"),
        }
    }
}

// ── Per-packet structs ────────────────────────────────────────────────────────

/// OFFER (0x02): broadcast by the server on the discovery port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferMessage {
    /// TCP port the server accepts game connections on.
    pub tcp_port: u16,
    /// Display name of the server, at most 32 bytes on the wire.
    pub server_name: String,
}

/// REQUEST (0x03): first and only control packet sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMessage {
    /// Number of rounds to play, 1–255.
    pub rounds: u8,
    /// Display name of the client, at most 32 bytes on the wire.
    pub client_name: String,
}

/// PAYLOAD (0x04): a dealt card, a decision, or a terminal round result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadMessage {
    pub decision: Decision,
    pub result: ResultCode,
    /// Card rank 1–13, or 0 on the terminal result packet.
    pub rank: u16,
    pub suit: u8,
}

impl PayloadMessage {
    /// A server packet revealing one card while the round is still running.
    pub fn card(card: Card) -> Self {
        Self {
            decision: Decision::Empty,
            result: ResultCode::NotOver,
            rank: u16::from(card.rank()),
            suit: card.suit() as u8,
        }
    }

    /// The terminal server packet carrying the round result.
    pub fn result(outcome: Outcome) -> Self {
        Self {
            decision: Decision::Empty,
            result: outcome.into(),
            rank: 0,
            suit: 0,
        }
    }

    /// A client packet carrying a hit/stand decision.
    pub fn decision(decision: Decision) -> Self {
        Self {
            decision,
            result: ResultCode::NotOver,
            rank: 0,
            suit: 0,
        }
    }

    /// Rank 0 from the server marks the end of a round.
    pub fn is_terminal(&self) -> bool {
        self.rank == 0
    }
}
