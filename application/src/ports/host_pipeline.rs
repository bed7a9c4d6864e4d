//! Host pipeline port
//!
//! The host pipeline is the external agent-messaging system that chat
//! messages are forwarded into. It receives one [`InboundChatMessage`] per
//! chat event together with a [`ReplyHandle`] it may use, now or later, to
//! answer the sender.

use crate::ports::connection::ConnectionLink;
use async_trait::async_trait;
use relay_domain::{AccountId, ChatMessage, OutboundFrame};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors reported by a host pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Host pipeline rejected message: {0}")]
    Rejected(String),

    #[error("Host pipeline unreachable: {0}")]
    Transport(String),
}

/// Conversation shape. Only one-to-one chats are relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Direct,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Direct => "direct",
        }
    }
}

/// A chat message in the host pipeline's format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundChatMessage {
    pub channel: String,
    pub account_id: AccountId,
    pub sender_id: String,
    pub chat_type: ChatType,
    pub chat_id: String,
    pub text: String,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl InboundChatMessage {
    /// Direct chat keyed by the sender.
    pub fn direct(channel: impl Into<String>, account_id: AccountId, message: ChatMessage) -> Self {
        Self {
            channel: channel.into(),
            account_id,
            chat_type: ChatType::Direct,
            chat_id: message.sender_id.clone(),
            sender_id: message.sender_id,
            text: message.text,
            message_id: message.message_id,
            timestamp: message.timestamp,
        }
    }
}

/// Sends replies back to the original sender over the connection the
/// message arrived on.
///
/// Replies are best-effort: when the connection is not open at the time of
/// the reply the frame is dropped and the host pipeline is not told.
#[derive(Clone)]
pub struct ReplyHandle {
    link: Arc<dyn ConnectionLink>,
    to: String,
}

impl ReplyHandle {
    pub fn new(link: Arc<dyn ConnectionLink>, to: impl Into<String>) -> Self {
        Self {
            link,
            to: to.into(),
        }
    }

    /// Participant the replies are addressed to
    pub fn recipient(&self) -> &str {
        &self.to
    }

    pub fn reply(&self, text: impl Into<String>) {
        self.deliver(OutboundFrame::message_to(self.to.clone(), text));
    }

    pub fn typing(&self, active: bool) {
        self.deliver(OutboundFrame::Typing {
            active,
            to: Some(self.to.clone()),
        });
    }

    fn deliver(&self, frame: OutboundFrame) {
        if !self.link.is_connected() {
            debug!(
                "Dropping {} reply to {} on account {}: connection is not open",
                frame.frame_type(),
                self.to,
                self.link.account_id()
            );
            return;
        }
        if let Err(e) = self.link.send(frame) {
            debug!("Dropping reply to {}: {}", self.to, e);
        }
    }
}

impl std::fmt::Debug for ReplyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyHandle")
            .field("account_id", self.link.account_id())
            .field("to", &self.to)
            .finish()
    }
}

/// Entry point of the host pipeline
#[async_trait]
pub trait HostPipeline: Send + Sync {
    /// Deliver one inbound chat message.
    ///
    /// Returns once the message has been accepted, not necessarily once a
    /// reply has been sent.
    async fn deliver(
        &self,
        message: InboundChatMessage,
        reply: ReplyHandle,
    ) -> Result<(), PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingLink;

    fn chat(sender: &str, text: &str) -> ChatMessage {
        ChatMessage {
            sender_id: sender.into(),
            text: text.into(),
            message_id: "m-1".into(),
            timestamp: Some(42),
        }
    }

    #[test]
    fn direct_message_uses_sender_as_chat_id() {
        let msg = InboundChatMessage::direct("relay", AccountId::new("a"), chat("user1", "hi"));
        assert_eq!(msg.chat_id, "user1");
        assert_eq!(msg.chat_type.as_str(), "direct");

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["chatType"], "direct");
        assert_eq!(json["accountId"], "a");
        assert_eq!(json["timestamp"], 42);
    }

    #[test]
    fn reply_targets_original_sender() {
        let link = RecordingLink::connected("a");
        let handle = ReplyHandle::new(link.clone(), "user1");
        handle.reply("hello back");

        assert_eq!(
            link.sent(),
            vec![OutboundFrame::message_to("user1", "hello back")]
        );
    }

    #[test]
    fn reply_is_dropped_when_disconnected() {
        let link = RecordingLink::disconnected("a");
        let handle = ReplyHandle::new(link.clone(), "user1");
        handle.reply("lost");
        handle.typing(true);

        assert!(link.sent().is_empty());
        assert_eq!(link.send_attempts(), 0);
    }
}
