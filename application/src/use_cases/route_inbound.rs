//! Inbound message routing
//!
//! [`MessageRouter`] classifies every inbound event and hands it to the
//! right collaborator:
//!
//! | Event | Handling |
//! |-------|----------|
//! | `connected` | status `connected`, last error cleared |
//! | `participant_joined` / `participant_left` | log only |
//! | `message` | host pipeline, with a reply handle to the sender |
//! | `wake` / `agent` | local hook dispatcher, answered with an `ack` |
//! | `error` | error log, status `last_error` |
//! | `pong` | nothing |
//! | unknown tag | debug log, ignored |
//!
//! One router serves every account; the account is taken from the link the
//! event arrived on. The transport awaits [`InboundHandler::handle`] before
//! reading the next frame, so a slow hook or pipeline delays the events
//! queued behind it on the same connection.

use crate::ports::connection::ConnectionLink;
use crate::ports::hook_dispatcher::{HookAccess, HookRequest};
use crate::ports::host_pipeline::{HostPipeline, InboundChatMessage, ReplyHandle};
use crate::ports::inbound_handler::InboundHandler;
use crate::ports::status_sink::{NoStatus, StatusPatch, StatusSink};
use async_trait::async_trait;
use relay_domain::{ChatMessage, InboundEvent, OutboundFrame};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Channel name reported to the host pipeline
pub const DEFAULT_CHANNEL: &str = "relay";

/// Routes inbound events to the host pipeline, hook dispatcher or status sink.
pub struct MessageRouter {
    channel: String,
    pipeline: Arc<dyn HostPipeline>,
    hooks: HookAccess,
    status: Arc<dyn StatusSink>,
}

impl MessageRouter {
    pub fn new(pipeline: Arc<dyn HostPipeline>, hooks: HookAccess) -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            pipeline,
            hooks,
            status: Arc::new(NoStatus),
        }
    }

    pub fn with_status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    async fn deliver_chat(&self, message: ChatMessage, link: Arc<dyn ConnectionLink>) {
        let account = link.account_id().clone();
        debug!(
            "Chat message {} from {} on account {} ({} chars)",
            message.message_id,
            message.sender_id,
            account,
            message.text.len()
        );

        let reply = ReplyHandle::new(Arc::clone(&link), message.sender_id.clone());
        let inbound = InboundChatMessage::direct(&self.channel, account, message);
        let message_id = inbound.message_id.clone();

        if let Err(e) = self.pipeline.deliver(inbound, reply).await {
            warn!("Host pipeline did not accept message {}: {}", message_id, e);
        }
    }

    async fn dispatch_hook(
        &self,
        message_id: String,
        request: HookRequest,
        link: Arc<dyn ConnectionLink>,
    ) {
        let kind = request.kind();

        let frame = match &self.hooks {
            HookAccess::Disabled(reason) => {
                warn!(
                    "Rejecting {} request {} on account {}: {}",
                    kind,
                    message_id,
                    link.account_id(),
                    reason
                );
                OutboundFrame::ack_error(&message_id, *reason)
            }
            HookAccess::Enabled(dispatcher) => match dispatcher.dispatch(&request).await {
                Ok(()) => {
                    info!("Dispatched {} request {}", kind, message_id);
                    OutboundFrame::ack_dispatched(&message_id)
                }
                Err(e) => {
                    warn!("{} hook failed for request {}: {}", kind, message_id, e);
                    OutboundFrame::ack_error(&message_id, e.to_string())
                }
            },
        };

        if let Err(e) = link.send(frame) {
            warn!("Could not acknowledge {} request {}: {}", kind, message_id, e);
        }
    }
}

#[async_trait]
impl InboundHandler for MessageRouter {
    async fn handle(&self, event: InboundEvent, link: Arc<dyn ConnectionLink>) {
        match event {
            InboundEvent::Connected {
                channel_id,
                participants,
            } => {
                info!(
                    "Account {} joined channel {} ({} participants)",
                    link.account_id(),
                    channel_id,
                    participants.len()
                );
                self.status.update(link.account_id(), StatusPatch::connected());
            }
            InboundEvent::ParticipantJoined { participant } => {
                info!(
                    "Participant joined on account {}: {}",
                    link.account_id(),
                    participant.id
                );
            }
            InboundEvent::ParticipantLeft { participant } => {
                info!(
                    "Participant left on account {}: {}",
                    link.account_id(),
                    participant.id
                );
            }
            InboundEvent::Message(message) => {
                self.deliver_chat(message, link).await;
            }
            InboundEvent::Wake {
                message_id,
                payload,
            } => {
                self.dispatch_hook(message_id, HookRequest::Wake(payload), link)
                    .await;
            }
            InboundEvent::Agent {
                message_id,
                payload,
            } => {
                self.dispatch_hook(message_id, HookRequest::Agent(payload), link)
                    .await;
            }
            InboundEvent::Error { message, code } => {
                error!(
                    "Gateway error on account {}: {} (code: {})",
                    link.account_id(),
                    message,
                    code.as_deref().unwrap_or("none")
                );
                self.status.update(link.account_id(), StatusPatch::error(message));
            }
            InboundEvent::Pong => {
                trace!("Keepalive response on account {}", link.account_id());
            }
            InboundEvent::Unknown { event_type } => {
                debug!(
                    "Ignoring unknown event type '{}' on account {}",
                    event_type,
                    link.account_id()
                );
            }
        }
    }
}
