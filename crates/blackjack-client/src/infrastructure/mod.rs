//! Infrastructure layer for the client application.
//!
//! Contains the OS-facing adapters: UDP discovery and TCP connect, the
//! console seat, and TOML configuration.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `blackjack_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`network`** – Listens for OFFER datagrams and opens the TCP connection
//!   to the server that sent one.
//!
//! - **`console`** – A `PlayerSeat` that prints the table to stdout and reads
//!   hit/stand answers from stdin, plus the rounds-to-play prompt.
//!
//! - **`storage`** – Loads `client.toml` from the platform config directory.

pub mod console;
pub mod network;
pub mod storage;
