//! Protocol module containing packet types and the fixed-layout codec.

pub mod codec;
pub mod messages;

pub use codec::{
    decode_offer, decode_payload, decode_request, encode_offer, encode_payload, encode_request,
    ProtocolError,
};
pub use messages::*;
