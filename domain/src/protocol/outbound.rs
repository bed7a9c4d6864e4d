//! Outbound frames (relay → gateway)

use crate::protocol::error::ProtocolError;
use serde::{Deserialize, Serialize};

/// Outcome reported in an acknowledgment frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Dispatched,
    Error,
}

/// A frame sent to the gateway service.
///
/// Frames that carry a `to` target one participant; without it they are
/// broadcast to the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    Message {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    StreamChunk {
        stream_id: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    StreamDone {
        stream_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
    Typing {
        active: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
    /// Acknowledges an out-of-band request by its message id.
    #[serde(rename_all = "camelCase")]
    Ack {
        message_id: String,
        status: AckStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Error {
        message: String,
    },
    /// Keepalive request.
    Ping,
}

impl OutboundFrame {
    /// Chat message addressed to one participant.
    pub fn message_to(to: impl Into<String>, text: impl Into<String>) -> Self {
        OutboundFrame::Message {
            text: text.into(),
            to: Some(to.into()),
        }
    }

    /// Chat message broadcast to the channel.
    pub fn broadcast(text: impl Into<String>) -> Self {
        OutboundFrame::Message {
            text: text.into(),
            to: None,
        }
    }

    pub fn ack_dispatched(message_id: impl Into<String>) -> Self {
        OutboundFrame::Ack {
            message_id: message_id.into(),
            status: AckStatus::Dispatched,
            error: None,
        }
    }

    pub fn ack_error(message_id: impl Into<String>, error: impl Into<String>) -> Self {
        OutboundFrame::Ack {
            message_id: message_id.into(),
            status: AckStatus::Error,
            error: Some(error.into()),
        }
    }

    /// The wire tag of this frame.
    pub fn frame_type(&self) -> &'static str {
        match self {
            OutboundFrame::Message { .. } => "message",
            OutboundFrame::StreamChunk { .. } => "stream_chunk",
            OutboundFrame::StreamDone { .. } => "stream_done",
            OutboundFrame::Typing { .. } => "typing",
            OutboundFrame::Ack { .. } => "ack",
            OutboundFrame::Error { .. } => "error",
            OutboundFrame::Ping => "ping",
        }
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn to_json(frame: &OutboundFrame) -> Value {
        serde_json::from_str(&frame.encode().unwrap()).unwrap()
    }

    #[test]
    fn targeted_message_carries_to() {
        let json = to_json(&OutboundFrame::message_to("user1", "hi"));
        assert_eq!(json, json!({"type": "message", "text": "hi", "to": "user1"}));
    }

    #[test]
    fn broadcast_message_omits_to() {
        let json = to_json(&OutboundFrame::broadcast("hi all"));
        assert_eq!(json, json!({"type": "message", "text": "hi all"}));
    }

    #[test]
    fn ack_frames() {
        assert_eq!(
            to_json(&OutboundFrame::ack_dispatched("w-1")),
            json!({"type": "ack", "messageId": "w-1", "status": "dispatched"})
        );
        assert_eq!(
            to_json(&OutboundFrame::ack_error("w-2", "HTTP 500: boom")),
            json!({"type": "ack", "messageId": "w-2", "status": "error", "error": "HTTP 500: boom"})
        );
    }

    #[test]
    fn stream_and_typing_frames() {
        let chunk = OutboundFrame::StreamChunk {
            stream_id: "s-1".into(),
            text: "par".into(),
            to: Some("user1".into()),
        };
        assert_eq!(
            to_json(&chunk),
            json!({"type": "stream_chunk", "streamId": "s-1", "text": "par", "to": "user1"})
        );
        let done = OutboundFrame::StreamDone {
            stream_id: "s-1".into(),
            to: None,
        };
        assert_eq!(to_json(&done), json!({"type": "stream_done", "streamId": "s-1"}));
        let typing = OutboundFrame::Typing {
            active: true,
            to: None,
        };
        assert_eq!(to_json(&typing), json!({"type": "typing", "active": true}));
    }

    #[test]
    fn ping_is_bare_tag() {
        assert_eq!(to_json(&OutboundFrame::Ping), json!({"type": "ping"}));
        assert_eq!(OutboundFrame::Ping.frame_type(), "ping");
    }
}
