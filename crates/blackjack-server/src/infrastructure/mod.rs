//! Infrastructure layer for the server application.
//!
//! Contains OS-facing adapters: the TCP accept loop, the UDP offer
//! broadcaster, and TOML configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `blackjack_core`, but MUST NOT be imported by the `application` layer.

pub mod network;
pub mod storage;
