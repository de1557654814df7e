//! Application layer use cases for the client.
//!
//! - **`seat`** – The decision boundary.  A [`seat::PlayerSeat`] is asked
//!   "hit or stand?" and told about dealt cards and results; it knows nothing
//!   about sockets.
//!
//! - **`play_round`** – The client half of the round protocol: attributes
//!   each dealt card to the player or the dealer, asks the seat when a
//!   decision is due, and stops at the terminal packet.
//!
//! - **`play_session`** – Sends the REQUEST and plays the negotiated number
//!   of rounds, tallying results into [`play_session::ClientStats`].

pub mod play_round;
pub mod play_session;
pub mod seat;

use std::io::ErrorKind;

use blackjack_core::{
    decode_payload, encode_payload, protocol::messages::PAYLOAD_SIZE, GameError, PayloadMessage,
    ProtocolError,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Errors that end the current session on the client side.
#[derive(Debug, Error)]
pub enum PlayError {
    /// The server sent something that is not a valid PAYLOAD.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server dealt a card that does not exist.
    #[error("invalid card from server: {0}")]
    Game(#[from] GameError),

    /// A rank-0 packet arrived without a result code.
    #[error("terminal packet carried no result")]
    MissingResult,

    /// The server closed the connection or the socket was reset.
    #[error("server disconnected")]
    ServerDisconnected,

    /// Any other socket failure.
    #[error("connection I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<std::io::Error> for PlayError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe => PlayError::ServerDisconnected,
            _ => PlayError::Io(e),
        }
    }
}

pub(crate) async fn read_payload<S>(stream: &mut S) -> Result<PayloadMessage, PlayError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = [0u8; PAYLOAD_SIZE];
    stream.read_exact(&mut buf).await?;
    Ok(decode_payload(&buf)?)
}

pub(crate) async fn write_payload<S>(stream: &mut S, msg: &PayloadMessage) -> Result<(), PlayError>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&encode_payload(msg)).await?;
    Ok(())
}
