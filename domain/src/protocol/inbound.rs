//! Inbound events (gateway → relay)

use crate::hook::{AgentTurnPayload, WakePayload};
use crate::protocol::error::ProtocolError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tags the router knows how to handle. Anything else decodes to
/// [`InboundEvent::Unknown`].
const KNOWN_TYPES: &[&str] = &[
    "connected",
    "participant_joined",
    "participant_left",
    "message",
    "wake",
    "agent",
    "error",
    "pong",
];

/// A participant of the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// A chat message sent by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender_id: String,
    pub text: String,
    pub message_id: String,
    /// Milliseconds since the Unix epoch, as stamped by the sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// An event received from the gateway service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// The channel accepted this connection.
    #[serde(rename_all = "camelCase")]
    Connected {
        channel_id: String,
        #[serde(default)]
        participants: Vec<Participant>,
    },
    ParticipantJoined {
        participant: Participant,
    },
    ParticipantLeft {
        participant: Participant,
    },
    Message(ChatMessage),
    /// Out-of-band wake request.
    #[serde(rename_all = "camelCase")]
    Wake {
        message_id: String,
        payload: WakePayload,
    },
    /// Out-of-band isolated agent-turn request.
    #[serde(rename_all = "camelCase")]
    Agent {
        message_id: String,
        payload: AgentTurnPayload,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    /// Keepalive response.
    Pong,
    /// A tag this build does not recognize.
    #[serde(skip)]
    Unknown { event_type: String },
}

impl InboundEvent {
    /// Decode one text frame.
    ///
    /// Unknown tags are not an error: they yield [`InboundEvent::Unknown`]
    /// so newer gateways can add message kinds without breaking older relays.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;

        let event_type = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?
            .to_string();

        if !KNOWN_TYPES.contains(&event_type.as_str()) {
            return Ok(InboundEvent::Unknown { event_type });
        }

        serde_json::from_value(value)
            .map_err(|source| ProtocolError::InvalidEvent { event_type, source })
    }

    /// The wire tag of this event.
    pub fn event_type(&self) -> &str {
        match self {
            InboundEvent::Connected { .. } => "connected",
            InboundEvent::ParticipantJoined { .. } => "participant_joined",
            InboundEvent::ParticipantLeft { .. } => "participant_left",
            InboundEvent::Message(_) => "message",
            InboundEvent::Wake { .. } => "wake",
            InboundEvent::Agent { .. } => "agent",
            InboundEvent::Error { .. } => "error",
            InboundEvent::Pong => "pong",
            InboundEvent::Unknown { event_type } => event_type,
        }
    }
}
