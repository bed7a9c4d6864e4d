//! [`Connector`] producing WebSocket transports.

use super::transport::WebSocketTransport;
use relay_application::ports::connection::{ConnectionHandle, Connector};
use relay_application::ports::inbound_handler::InboundHandler;
use relay_application::ports::status_sink::{NoStatus, StatusSink};
use relay_domain::ResolvedAccount;
use std::sync::Arc;

/// Builds one [`WebSocketTransport`] per account, all reporting to the same
/// status sink.
pub struct WebSocketConnector {
    status: Arc<dyn StatusSink>,
}

impl WebSocketConnector {
    pub fn new() -> Self {
        Self {
            status: Arc::new(NoStatus),
        }
    }

    pub fn with_status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }
}

impl Default for WebSocketConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for WebSocketConnector {
    fn connect(
        &self,
        account: ResolvedAccount,
        handler: Arc<dyn InboundHandler>,
    ) -> Arc<dyn ConnectionHandle> {
        Arc::new(WebSocketTransport::new(account, handler).with_status(Arc::clone(&self.status)))
    }
}
