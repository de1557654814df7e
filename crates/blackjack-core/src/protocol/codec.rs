//! Fixed-layout codec for the three LAN Blackjack packets.
//!
//! Wire formats:
//! ```text
//! OFFER   [cookie:4][type:1=0x02][tcp_port:2][name:32]                       39 bytes
//! REQUEST [cookie:4][type:1=0x03][rounds:1][name:32]                         38 bytes
//! PAYLOAD [cookie:4][type:1=0x04][decision:5][result:1][rank:2][suit:1]      14 bytes
//! ```
//! All multi-byte integers are big-endian.  Every decoder is total: it returns
//! a complete record or a [`ProtocolError`], never a partial read.

use crate::protocol::messages::{
    Decision, MessageType, OfferMessage, PayloadMessage, RequestMessage, ResultCode,
    DECISION_LEN, MAGIC_COOKIE, NAME_FIELD_LEN, OFFER_SIZE, PAYLOAD_SIZE, REQUEST_SIZE,
};
use thiserror::Error;

/// Errors that can occur during packet encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// Wrong length, or a field value outside its valid range.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    /// Magic cookie or type tag does not match what this context expects.
    #[error("protocol mismatch: cookie 0x{cookie:08X}, type 0x{type_tag:02X}, expected {expected:?}")]
    ProtocolMismatch {
        cookie: u32,
        type_tag: u8,
        expected: MessageType,
    },

    /// A REQUEST asked for zero rounds.
    #[error("invalid request: rounds must be between 1 and 255, got {0}")]
    InvalidRequest(u8),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an OFFER packet.  Names longer than 32 bytes are truncated.
///
/// # Examples
///
/// ```rust
/// use blackjack_core::{decode_offer, encode_offer, OfferMessage};
///
/// let offer = OfferMessage { tcp_port: 5000, server_name: "Table 1".to_string() };
/// let bytes = encode_offer(&offer);
/// assert_eq!(bytes.len(), 39);
/// assert_eq!(decode_offer(&bytes).unwrap(), offer);
/// ```
pub fn encode_offer(msg: &OfferMessage) -> [u8; OFFER_SIZE] {
    let mut buf = [0u8; OFFER_SIZE];
    write_header(&mut buf, MessageType::Offer);
    buf[5..7].copy_from_slice(&msg.tcp_port.to_be_bytes());
    write_name(&mut buf[7..], &msg.server_name);
    buf
}

/// Decodes an OFFER packet.
///
/// # Errors
///
/// [`ProtocolError::MalformedPacket`] if `bytes` is not exactly 39 bytes long
/// or the name is not UTF-8; [`ProtocolError::ProtocolMismatch`] if the cookie
/// or type tag is wrong.
pub fn decode_offer(bytes: &[u8]) -> Result<OfferMessage, ProtocolError> {
    check_header(bytes, OFFER_SIZE, MessageType::Offer)?;
    let tcp_port = u16::from_be_bytes([bytes[5], bytes[6]]);
    let server_name = read_name(&bytes[7..])?;
    Ok(OfferMessage {
        tcp_port,
        server_name,
    })
}

/// Encodes a REQUEST packet.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidRequest`] when `rounds` is zero.
pub fn encode_request(msg: &RequestMessage) -> Result<[u8; REQUEST_SIZE], ProtocolError> {
    if msg.rounds == 0 {
        return Err(ProtocolError::InvalidRequest(msg.rounds));
    }
    let mut buf = [0u8; REQUEST_SIZE];
    write_header(&mut buf, MessageType::Request);
    buf[5] = msg.rounds;
    write_name(&mut buf[6..], &msg.client_name);
    Ok(buf)
}

/// Decodes a REQUEST packet.
///
/// # Errors
///
/// [`ProtocolError::MalformedPacket`] on a wrong length or non-UTF-8 name,
/// [`ProtocolError::ProtocolMismatch`] on a bad cookie or type tag, and
/// [`ProtocolError::InvalidRequest`] when the round count is zero.
pub fn decode_request(bytes: &[u8]) -> Result<RequestMessage, ProtocolError> {
    check_header(bytes, REQUEST_SIZE, MessageType::Request)?;
    let rounds = bytes[5];
    if rounds == 0 {
        return Err(ProtocolError::InvalidRequest(rounds));
    }
    let client_name = read_name(&bytes[6..])?;
    Ok(RequestMessage {
        rounds,
        client_name,
    })
}

/// Encodes a PAYLOAD packet.
pub fn encode_payload(msg: &PayloadMessage) -> [u8; PAYLOAD_SIZE] {
    let mut buf = [0u8; PAYLOAD_SIZE];
    write_header(&mut buf, MessageType::Payload);
    buf[5..10].copy_from_slice(&msg.decision.to_bytes());
    buf[10] = msg.result as u8;
    buf[11..13].copy_from_slice(&msg.rank.to_be_bytes());
    buf[13] = msg.suit;
    buf
}

/// Decodes a PAYLOAD packet.
///
/// # Errors
///
/// [`ProtocolError::MalformedPacket`] on a wrong length or an unknown result
/// code; [`ProtocolError::ProtocolMismatch`] on a bad cookie or type tag.
pub fn decode_payload(bytes: &[u8]) -> Result<PayloadMessage, ProtocolError> {
    check_header(bytes, PAYLOAD_SIZE, MessageType::Payload)?;
    let mut raw_decision = [0u8; DECISION_LEN];
    raw_decision.copy_from_slice(&bytes[5..10]);
    let result = ResultCode::try_from(bytes[10]).map_err(|_| {
        ProtocolError::MalformedPacket(format!("unknown result code: {}", bytes[10]))
    })?;
    Ok(PayloadMessage {
        decision: Decision::from_bytes(raw_decision),
        result,
        rank: u16::from_be_bytes([bytes[11], bytes[12]]),
        suit: bytes[13],
    })
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn write_header(buf: &mut [u8], msg_type: MessageType) {
    buf[0..4].copy_from_slice(&MAGIC_COOKIE.to_be_bytes());
    buf[4] = msg_type as u8;
}

/// Length is checked before cookie and type so short buffers are never indexed.
fn check_header(bytes: &[u8], size: usize, expected: MessageType) -> Result<(), ProtocolError> {
    if bytes.len() != size {
        return Err(ProtocolError::MalformedPacket(format!(
            "{expected:?}: need exactly {size} bytes, got {}",
            bytes.len()
        )));
    }
    let cookie = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let type_tag = bytes[4];
    if cookie != MAGIC_COOKIE || type_tag != expected as u8 {
        return Err(ProtocolError::ProtocolMismatch {
            cookie,
            type_tag,
            expected,
        });
    }
    Ok(())
}

/// Writes `name` as UTF-8 into a zeroed 32-byte field.
///
/// Truncation backs off to a char boundary so the field always decodes.
fn write_name(field: &mut [u8], name: &str) {
    let mut end = name.len().min(NAME_FIELD_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    field[..end].copy_from_slice(&name.as_bytes()[..end]);
}

fn read_name(field: &[u8]) -> Result<String, ProtocolError> {
    let end = field
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    std::str::from_utf8(&field[..end])
        .map(str::to_string)
        .map_err(|e| ProtocolError::MalformedPacket(format!("name is not valid UTF-8: {e}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
