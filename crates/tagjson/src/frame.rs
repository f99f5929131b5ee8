//! # Message Envelope
//!
//! A message travels as a 5-slot array:
//!
//! ```text
//! [VERSION, name, kind, seqid, payload]
//! ```
//!
//! ## Invariants
//! - **Strict Version**: slot 0 must equal `VERSION` numerically (`1` or
//!   `1.0`), else `BadVersion`.
//! - **Exact Arity**: anything but 5 slots is `InvalidData` ("illegal data
//!   format").
//! - **Struct Payload**: the payload is always a `STRUCT`, both ways.

use serde_json::Value as Json;

use tagval::Message;
use tagval::MessageKind;
use tagval::ProtocolError;
use tagval::Result;

use crate::decode::decode_struct;
use crate::encode::serialize_struct_with;
use crate::options::CodecOptions;

/// Protocol version carried in slot 0 of every envelope.
pub const VERSION: i64 = 1;

/// Encodes `msg` as an envelope array.
pub fn encode_message(msg: &Message, options: &CodecOptions) -> Result<Json> {
    Ok(Json::Array(vec![
        Json::from(VERSION),
        Json::from(msg.name.as_str()),
        Json::from(msg.kind.code()),
        Json::from(msg.seqid),
        serialize_struct_with(&msg.payload, options)?,
    ]))
}

/// Checks arity and version, returning the five slots.
fn envelope(json: &Json) -> Result<&[Json]> {
    let slots = match json {
        Json::Array(slots) if slots.len() == 5 => slots.as_slice(),
        _ => return Err(ProtocolError::invalid_data("illegal data format").into()),
    };
    if slots[0].as_f64() != Some(VERSION as f64) {
        return Err(ProtocolError::bad_version(format!(
            "bad version {}, expected {}",
            slots[0], VERSION
        ))
        .into());
    }
    Ok(slots)
}

fn decode_seqid_slot(json: &Json) -> Result<i32> {
    json.as_i64()
        .and_then(|s| i32::try_from(s).ok())
        .ok_or_else(|| {
            ProtocolError::invalid_data(format!("invalid sequence id {}", json)).into()
        })
}

/// Decodes an envelope array into a `Message`.
pub fn decode_message(json: &Json, options: &CodecOptions) -> Result<Message> {
    let slots = envelope(json)?;

    let name = slots[1]
        .as_str()
        .ok_or_else(|| {
            ProtocolError::invalid_data(format!("invalid message name {}", slots[1]))
        })?;
    let kind = slots[2]
        .as_i64()
        .and_then(MessageKind::from_code)
        .ok_or_else(|| {
            ProtocolError::invalid_data(format!("invalid message type {}", slots[2]))
        })?;
    let seqid = decode_seqid_slot(&slots[3])?;
    let payload = decode_struct(&slots[4], options, 0)?;

    Ok(Message {
        name: name.to_string(),
        kind,
        seqid,
        payload,
    })
}

/// Extracts only the sequence id from an envelope.
///
/// Useful for routing a reply when its payload may not decode.
pub fn decode_seqid(json: &Json) -> Result<i32> {
    let slots = envelope(json)?;
    decode_seqid_slot(&slots[3])
}
