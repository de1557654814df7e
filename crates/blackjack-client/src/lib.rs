//! blackjack-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does blackjack-client do?
//!
//! 1. Listens on the UDP discovery port until a server OFFER arrives.
//! 2. Connects to the offering server over TCP and sends one REQUEST with the
//!    player's name and the number of rounds.
//! 3. Plays each round: dealt cards arrive one PAYLOAD at a time, and the
//!    seat (a human at the console, or the automatic policy) answers
//!    hit/stand when the protocol calls for a decision.
//! 4. Prints the session summary and goes back to listening.  Connection
//!    loss is reported and also leads back to listening; the win/loss
//!    tally survives.

/// Application layer: seat abstraction, round player and session.
pub mod application;

/// Infrastructure layer: discovery, TCP connect, console and config.
pub mod infrastructure;
