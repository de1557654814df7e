//! Network infrastructure for the client application.
//!
//! - `discovery` waits for an OFFER on the UDP discovery port.
//! - [`connect`] opens the TCP game connection to the offering server.

pub mod discovery;

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpStream;
use tracing::{info, warn};

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ClientNetworkError {
    /// The discovery socket could not be bound.
    #[error("failed to bind discovery socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// TCP connection to the server failed.
    #[error("failed to connect to server at {addr}: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred while receiving a datagram.
    #[error("recv error: {0}")]
    Recv(#[source] std::io::Error),
}

/// Connects to a game server with Nagle disabled.
///
/// # Errors
///
/// Returns [`ClientNetworkError::ConnectFailed`] if the server is unreachable.
pub async fn connect(addr: SocketAddr) -> Result<TcpStream, ClientNetworkError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| ClientNetworkError::ConnectFailed { addr, source })?;
    if let Err(e) = stream.set_nodelay(true) {
        warn!("could not disable Nagle for {addr}: {e}");
    }
    info!("connected to server at {addr}");
    Ok(stream)
}
