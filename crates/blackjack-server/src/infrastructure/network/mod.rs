//! Network infrastructure for the server application.
//!
//! # Sub-modules
//!
//! - **`listener`** – Accepts TCP connections and spawns one task per
//!   connection running the `serve_session` use case.
//!
//! - **`broadcaster`** – Periodically sends an OFFER datagram to the LAN
//!   broadcast address so clients can find this server without manual
//!   configuration.
//!
//! Both loops stop when the shared shutdown signal flips to `true`.

pub mod broadcaster;
pub mod listener;

use std::net::SocketAddr;

use thiserror::Error;

/// Error type for server socket setup.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// Any other socket failure.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
}
