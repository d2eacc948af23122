//! Wire codec for the store protocol.
//!
//! Thin layer over `prost` that turns decode failures into [`DecodeError`]
//! and names the message that failed. Decoding is all-or-nothing: a
//! truncated or corrupt buffer never yields a partially populated message.
//!
//! The [`projection`] submodule turns any schema message into a dictionary
//! value or a text dump for inspection.

pub mod projection;

use prost::Message;

use crate::error::DecodeError;
use crate::proto::ResponseWrapper;

pub use projection::{to_text, to_value};

/// Serializes a request message to its wire form.
pub fn encode<M: Message>(message: &M) -> Vec<u8> {
    message.encode_to_vec()
}

/// Decodes a message of type `M` from `bytes`.
pub fn decode<M: Message + Default>(bytes: &[u8]) -> Result<M, DecodeError> {
    M::decode(bytes).map_err(|source| DecodeError::new(short_type_name::<M>(), source))
}

/// Decodes the wrapper every `fdfe` endpoint answers with.
pub fn decode_response(bytes: &[u8]) -> Result<ResponseWrapper, DecodeError> {
    decode::<ResponseWrapper>(bytes)
}

fn short_type_name<M>() -> &'static str {
    let full = std::any::type_name::<M>();
    full.rsplit("::").next().unwrap_or(full)
}
