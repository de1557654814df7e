//! Application layer use cases for the server.
//!
//! - **`play_round`** – The per-round state machine: deal, read the player's
//!   decisions, reveal the dealer's hand and send the result.
//!
//! - **`serve_session`** – Reads the client's REQUEST and plays the requested
//!   number of rounds back to back on the same connection.
//!
//! Both use cases are generic over `AsyncRead + AsyncWrite`, so tests drive
//! them through in-memory streams instead of real sockets.

pub mod play_round;
pub mod serve_session;

use std::io::ErrorKind;

use blackjack_core::{
    decode_payload, encode_payload, protocol::messages::PAYLOAD_SIZE, GameError, PayloadMessage,
    ProtocolError,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Errors that end a round, and with it the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A packet failed to decode or arrived with the wrong cookie/type.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The engine rejected an operation; indicates an orchestration bug.
    #[error("game engine error: {0}")]
    Game(#[from] GameError),

    /// The peer closed the connection or the socket was reset.
    #[error("peer disconnected")]
    PeerDisconnected,

    /// Any other socket failure.
    #[error("connection I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe => SessionError::PeerDisconnected,
            _ => SessionError::Io(e),
        }
    }
}

/// Reads exactly one PAYLOAD packet.
pub(crate) async fn read_payload<S>(stream: &mut S) -> Result<PayloadMessage, SessionError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = [0u8; PAYLOAD_SIZE];
    stream.read_exact(&mut buf).await?;
    Ok(decode_payload(&buf)?)
}

/// Encodes and writes one PAYLOAD packet.
pub(crate) async fn write_payload<S>(
    stream: &mut S,
    msg: &PayloadMessage,
) -> Result<(), SessionError>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&encode_payload(msg)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_and_reset_map_to_peer_disconnected() {
        for kind in [
            ErrorKind::UnexpectedEof,
            ErrorKind::ConnectionReset,
            ErrorKind::ConnectionAborted,
            ErrorKind::BrokenPipe,
        ] {
            let err = SessionError::from(std::io::Error::new(kind, "gone"));
            assert!(matches!(err, SessionError::PeerDisconnected), "{kind:?}");
        }
    }

    #[test]
    fn test_other_io_errors_stay_io() {
        let err = SessionError::from(std::io::Error::new(ErrorKind::PermissionDenied, "no"));
        assert!(matches!(err, SessionError::Io(_)));
    }

    #[tokio::test]
    async fn test_read_payload_on_closed_stream_is_peer_disconnected() {
        // Arrange: the far end is dropped before anything is written
        let (mut near, far) = tokio::io::duplex(64);
        drop(far);

        // Act
        let result = read_payload(&mut near).await;

        // Assert
        assert!(matches!(result, Err(SessionError::PeerDisconnected)));
    }
}
