//! # blackjack-core
//!
//! Shared library for LAN Blackjack containing the packet codec and the
//! blackjack game engine.
//!
//! This crate is used by both the server and client applications.
//! It has zero dependencies on OS APIs or network sockets.
//!
//! # Architecture overview
//!
//! A server advertises itself on the LAN with a UDP `Offer`, a client
//! connects over TCP and sends one `Request` naming how many rounds it wants,
//! and the two then exchange fixed-size `Payload` packets until every round
//! has produced a result.
//!
//! - **`protocol`** – How bytes travel over the network.  Three fixed-layout
//!   packets (39-byte offer, 38-byte request, 14-byte payload) are encoded
//!   into big-endian byte arrays and decoded back into typed Rust structs.
//!
//! - **`game`** – Pure game rules: cards, the shuffled 52-card deck, hand
//!   totals, the dealer's draw-to-17 policy and result computation.

pub mod game;
pub mod protocol;

pub use game::{
    card::{Card, Suit},
    deck::Deck,
    hand::Hand,
    round::{Outcome, Round},
    GameError,
};
pub use protocol::codec::{
    decode_offer, decode_payload, decode_request, encode_offer, encode_payload, encode_request,
    ProtocolError,
};
pub use protocol::messages::{
    Decision, MessageType, OfferMessage, PayloadMessage, RequestMessage, ResultCode,
};
