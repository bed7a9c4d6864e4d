//! Protocol encode/decode errors

use thiserror::Error;

/// Errors raised while decoding inbound or encoding outbound messages
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Frame has no \"type\" field")]
    MissingType,

    #[error("Invalid '{event_type}' event: {source}")]
    InvalidEvent {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),
}
