//! Correlation-id propagation strategies
//!
//! A correlation id links a reply message to its originating request. How
//! it travels between the provider header and the internal message is
//! deployment-specific, so the strategies are modeled as tagged variants
//! applied on both the inbound and outbound paths.

use crate::message::AdapterMessage;
use crate::provider::ProviderMessage;

/// Reserved metadata key used by [`CorrelationIdPolicy::ProviderNative`]
pub const CORRELATION_ID_METADATA_KEY: &str = "jms_correlation_id";

/// How correlation ids propagate between provider header and metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelationIdPolicy {
    /// Correlation ids are not propagated
    None,
    /// Copy the provider-native correlation id to and from the reserved
    /// metadata key
    ProviderNative,
    /// Copy the correlation id to and from a caller-chosen metadata key
    MetadataKey(String),
    /// Stamp outbound messages with the internal message's unique id;
    /// inbound messages are left untouched
    DeriveFromUniqueId,
}

impl CorrelationIdPolicy {
    /// Propagate the provider correlation id onto an inbound message
    pub fn apply_inbound(&self, raw: &ProviderMessage, message: &mut AdapterMessage) {
        let key = match self {
            CorrelationIdPolicy::None | CorrelationIdPolicy::DeriveFromUniqueId => return,
            CorrelationIdPolicy::ProviderNative => CORRELATION_ID_METADATA_KEY,
            CorrelationIdPolicy::MetadataKey(key) => key.as_str(),
        };
        if let Some(id) = &raw.correlation_id {
            message.add_metadata(key, id.clone());
        }
    }

    /// Stamp the provider correlation id on an outbound message
    pub fn apply_outbound(&self, message: &AdapterMessage, raw: &mut ProviderMessage) {
        match self {
            CorrelationIdPolicy::None => {}
            CorrelationIdPolicy::ProviderNative => {
                if let Some(id) = message.metadata_value(CORRELATION_ID_METADATA_KEY) {
                    raw.correlation_id = Some(id.to_string());
                }
            }
            CorrelationIdPolicy::MetadataKey(key) => {
                if let Some(id) = message.metadata_value(key) {
                    raw.correlation_id = Some(id.to_string());
                }
            }
            CorrelationIdPolicy::DeriveFromUniqueId => {
                raw.correlation_id = Some(message.unique_id().to_string());
            }
        }
    }
}

impl Default for CorrelationIdPolicy {
    fn default() -> Self {
        CorrelationIdPolicy::None
    }
}
