//! Message translation boundary
//!
//! Translators convert between the provider's wire-shaped message and the
//! internal representation. The coordinator calls them as an opaque step;
//! the reference implementations here cover the text and byte shapes and
//! carry provider string properties to internal metadata and back.

use bytes::Bytes;

use crate::error::{JmsError, Result};
use crate::message::AdapterMessage;
use crate::provider::{MessageBody, ProviderMessage};

/// Bidirectional raw/internal message conversion.
///
/// Implementations are pluggable by message shape. A translation failure on
/// the inbound path is the one delivery error severe enough to abort the
/// delivery loop when the session is transacted.
pub trait MessageTranslator: Send + Sync {
    /// Convert a raw provider message to the internal representation
    fn to_internal(&self, raw: &ProviderMessage) -> Result<AdapterMessage>;

    /// Convert an internal message to a raw provider message
    fn to_provider(&self, message: &AdapterMessage) -> Result<ProviderMessage>;
}

/// Copy provider string properties into message metadata
fn properties_to_metadata(raw: &ProviderMessage, message: &mut AdapterMessage) {
    for (key, value) in &raw.properties {
        message.add_metadata(key.clone(), value.clone());
    }
}

/// Copy message metadata into provider string properties
fn metadata_to_properties(message: &AdapterMessage, raw: &mut ProviderMessage) {
    for (key, value) in message.metadata() {
        raw.properties.insert(key.clone(), value.clone());
    }
}

/// Translator for opaque byte payloads.
///
/// Accepts any body shape on the inbound path; text bodies arrive as their
/// UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesTranslator;

impl MessageTranslator for BytesTranslator {
    fn to_internal(&self, raw: &ProviderMessage) -> Result<AdapterMessage> {
        let payload = match &raw.body {
            MessageBody::Bytes(bytes) => bytes.clone(),
            MessageBody::Text(text) => Bytes::from(text.clone().into_bytes()),
            MessageBody::Empty => Bytes::new(),
        };
        let mut message = AdapterMessage::new(payload);
        properties_to_metadata(raw, &mut message);
        Ok(message)
    }

    fn to_provider(&self, message: &AdapterMessage) -> Result<ProviderMessage> {
        let mut raw = ProviderMessage::new(MessageBody::Bytes(message.payload().clone()));
        metadata_to_properties(message, &mut raw);
        Ok(raw)
    }
}

/// Translator for text payloads.
///
/// Rejects byte bodies on the inbound path rather than guessing an
/// encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTranslator;

impl MessageTranslator for TextTranslator {
    fn to_internal(&self, raw: &ProviderMessage) -> Result<AdapterMessage> {
        let payload = match &raw.body {
            MessageBody::Text(text) => Bytes::from(text.clone().into_bytes()),
            MessageBody::Empty => Bytes::new(),
            MessageBody::Bytes(_) => {
                return Err(JmsError::translation(
                    "expected a text body, received bytes",
                ));
            }
        };
        let mut message = AdapterMessage::new(payload);
        properties_to_metadata(raw, &mut message);
        Ok(message)
    }

    fn to_provider(&self, message: &AdapterMessage) -> Result<ProviderMessage> {
        let text = std::str::from_utf8(message.payload())
            .map_err(|e| JmsError::translation(format!("payload is not valid UTF-8: {}", e)))?
            .to_string();
        let mut raw = ProviderMessage::new(MessageBody::Text(text));
        metadata_to_properties(message, &mut raw);
        Ok(raw)
    }
}
