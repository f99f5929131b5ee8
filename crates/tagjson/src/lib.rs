//! # Tagjson
//!
//! A positionally-tagged JSON wire codec for `tagval` values.
//!
//! ## Architecture
//!
//! `encode` and `decode` map value trees to and from `serde_json::Value`;
//! `frame` does the same for message envelopes; `wire` holds the tag-string
//! tables both directions share. `JsonCodec` bundles them behind one set of
//! `CodecOptions` and adds the text boundary.
//!
//! Every validation failure is a `ProtocolError`. There is no partial decode.

pub mod decode;
pub mod encode;
pub mod frame;
pub mod options;
pub mod wire;

use serde_json::Value as Json;

use tagval::Message;
use tagval::ProtocolError;
use tagval::Result;
use tagval::Struct;
use tagval::TypeTag;
use tagval::Value;

pub use decode::deserialize;
pub use decode::deserialize_with;
pub use encode::serialize;
pub use encode::serialize_with;
pub use frame::VERSION;
pub use frame::decode_message;
pub use frame::decode_seqid;
pub use frame::encode_message;
pub use options::CodecOptions;
pub use wire::type_of_string;
pub use wire::type_string;

#[cfg(test)]
mod tests;

/// The codec with a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    options: CodecOptions,
}

impl JsonCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn serialize(&self, value: &Value) -> Result<Json> {
        serialize_with(value, &self.options)
    }

    pub fn deserialize(&self, json: &Json, ty: TypeTag) -> Result<Value> {
        deserialize_with(json, ty, &self.options).inspect_err(|e| {
            tracing::trace!(expected = %ty, error = %e, "rejected value");
        })
    }

    pub fn encode_message(&self, msg: &Message) -> Result<Json> {
        encode_message(msg, &self.options)
    }

    pub fn decode_message(&self, json: &Json) -> Result<Message> {
        decode_message(json, &self.options).inspect_err(|e| {
            tracing::trace!(error = %e, "rejected message envelope");
        })
    }

    /// Serializes `value` to compact JSON text.
    pub fn to_string(&self, value: &Value) -> Result<String> {
        Ok(self.serialize(value)?.to_string())
    }

    /// Parses JSON text and deserializes it as a value of tag `ty`.
    pub fn from_str(&self, text: &str, ty: TypeTag) -> Result<Value> {
        self.deserialize(&parse(text)?, ty)
    }

    pub fn struct_to_string(&self, s: &Struct) -> Result<String> {
        Ok(encode::serialize_struct_with(s, &self.options)?.to_string())
    }

    pub fn struct_from_str(&self, text: &str) -> Result<Struct> {
        match self.from_str(text, TypeTag::Struct)? {
            Value::Struct(s) => Ok(s),
            other => Err(ProtocolError::invalid_data(format!(
                "expected STRUCT, found {}",
                other.type_tag()
            ))
            .into()),
        }
    }

    pub fn message_to_string(&self, msg: &Message) -> Result<String> {
        Ok(self.encode_message(msg)?.to_string())
    }

    pub fn message_from_str(&self, text: &str) -> Result<Message> {
        self.decode_message(&parse(text)?)
    }
}

/// Parses JSON text, mapping syntax errors to `InvalidData`.
pub fn parse(text: &str) -> Result<Json> {
    serde_json::from_str(text).map_err(|e| {
        tracing::trace!(error = %e, "rejected json text");
        ProtocolError::invalid_data(format!("invalid json: {}", e)).into()
    })
}

/// Serializes `value` to JSON text with default options.
pub fn to_string(value: &Value) -> Result<String> {
    JsonCodec::default().to_string(value)
}

/// Deserializes JSON text as a value of tag `ty` with default options.
pub fn from_str(text: &str, ty: TypeTag) -> Result<Value> {
    JsonCodec::default().from_str(text, ty)
}

pub fn message_to_string(msg: &Message) -> Result<String> {
    JsonCodec::default().message_to_string(msg)
}

pub fn message_from_str(text: &str) -> Result<Message> {
    JsonCodec::default().message_from_str(text)
}
