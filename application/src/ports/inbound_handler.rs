//! Inbound event handler port
//!
//! The transport calls [`InboundHandler::handle`] once per decoded event and
//! awaits it before reading the next frame, so events from one connection are
//! handled strictly in arrival order.

use crate::ports::connection::ConnectionLink;
use async_trait::async_trait;
use relay_domain::InboundEvent;
use std::sync::Arc;

#[async_trait]
pub trait InboundHandler: Send + Sync {
    /// Handle one event received on `link`.
    async fn handle(&self, event: InboundEvent, link: Arc<dyn ConnectionLink>);
}
