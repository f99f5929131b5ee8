//! # JSON Protocol
//!
//! Binds a `JsonCodec` to exactly one transport.
//!
//! ## Invariants
//! - **One Flow**: one read or one write at a time. Callers that interleave
//!   operations from several tasks own the consequences; correlation of
//!   in-flight calls belongs above this layer, keyed on the sequence id.
//! - **Sync Codec**: only the transport call awaits; encoding and decoding
//!   run to completion on the calling task.

use std::sync::Arc;

use tagjson::CodecOptions;
use tagjson::JsonCodec;
use tagval::Message;
use tagval::Result;
use tagval::Struct;

use crate::transport::Transport;

pub struct JsonProtocol {
    transport: Arc<dyn Transport>,
    codec: JsonCodec,
}

impl JsonProtocol {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_options(transport, CodecOptions::default())
    }

    pub fn with_options(transport: Arc<dyn Transport>, options: CodecOptions) -> Self {
        Self {
            transport,
            codec: JsonCodec::new(options),
        }
    }

    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Encodes `msg` as an envelope and writes it.
    pub async fn write_message(&self, msg: &Message) -> Result<()> {
        let text = self.codec.message_to_string(msg)?;
        tracing::debug!(name = %msg.name, kind = ?msg.kind, seqid = msg.seqid, "writing message");
        tracing::trace!(bytes = text.len(), "message encoded");
        self.transport.write(&text).await?;
        Ok(())
    }

    /// Encodes `s` as a bare struct and writes it.
    pub async fn write_struct(&self, s: &Struct) -> Result<()> {
        let text = self.codec.struct_to_string(s)?;
        tracing::debug!(fields = s.len(), "writing struct");
        tracing::trace!(bytes = text.len(), "struct encoded");
        self.transport.write(&text).await?;
        Ok(())
    }

    /// Reads one envelope and decodes it.
    pub async fn read_message(&self) -> Result<Message> {
        let text = self.transport.read().await?;
        tracing::trace!(bytes = text.len(), "message received");
        let msg = self.codec.message_from_str(&text).inspect_err(|e| {
            tracing::warn!(error = %e, "dropping malformed message");
        })?;
        tracing::debug!(name = %msg.name, kind = ?msg.kind, seqid = msg.seqid, "read message");
        Ok(msg)
    }

    /// Reads one bare struct and decodes it.
    pub async fn read_struct(&self) -> Result<Struct> {
        let text = self.transport.read().await?;
        tracing::trace!(bytes = text.len(), "struct received");
        let s = self.codec.struct_from_str(&text).inspect_err(|e| {
            tracing::warn!(error = %e, "dropping malformed struct");
        })?;
        tracing::debug!(fields = s.len(), "read struct");
        Ok(s)
    }
}
