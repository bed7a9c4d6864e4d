//! Account supervision use case
//!
//! [`AccountSupervisor`] owns the [`ConnectionRegistry`] and every account's
//! lifecycle: it validates and starts accounts, stops them, and is the
//! outbound entry point the host uses to talk to the gateway.

use crate::ports::connection::{ConnectionLink, Connector, SendError};
use crate::ports::inbound_handler::InboundHandler;
use crate::ports::status_sink::{NoStatus, StatusPatch, StatusSink};
use crate::registry::ConnectionRegistry;
use relay_domain::{AccountId, DomainError, OutboundFrame, ResolvedAccount};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that can occur when starting an account
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartAccountError {
    /// The account is disabled or missing mandatory settings. Not retried.
    #[error("Configuration error: {0}")]
    Configuration(#[from] DomainError),
}

/// Starts, stops and sends for accounts.
pub struct AccountSupervisor {
    connector: Arc<dyn Connector>,
    handler: Arc<dyn InboundHandler>,
    status: Arc<dyn StatusSink>,
    registry: ConnectionRegistry,
}

impl AccountSupervisor {
    pub fn new(connector: Arc<dyn Connector>, handler: Arc<dyn InboundHandler>) -> Self {
        Self {
            connector,
            handler,
            status: Arc::new(NoStatus),
            registry: ConnectionRegistry::new(),
        }
    }

    pub fn with_status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Start `account` in the background.
    ///
    /// Returns as soon as the connection task is spawned; whether the
    /// connection opens is only visible through status and logs. A running
    /// connection for the same account is stopped and replaced.
    pub fn start_account(
        &self,
        account: ResolvedAccount,
        cancel: CancellationToken,
    ) -> Result<(), StartAccountError> {
        account.ensure_startable()?;

        let id = account.id.clone();
        if let Some(previous) = self.registry.remove(&id) {
            warn!("Account {} was already running, replacing connection", id);
            previous.stop();
        }

        info!("Starting account {} ({})", id, account.name);
        let handle = self.connector.connect(account, Arc::clone(&self.handler));
        handle.start(cancel);
        self.registry.insert(handle);
        self.status.update(&id, StatusPatch::started());

        Ok(())
    }

    /// Stop and unregister `account`. Returns `false` if it was not running.
    pub fn stop_account(&self, account: &AccountId) -> bool {
        match self.registry.remove(account) {
            Some(handle) => {
                info!("Stopping account {}", account);
                handle.stop();
                self.status.update(account, StatusPatch::stopped());
                true
            }
            None => false,
        }
    }

    /// Stop every running account.
    pub fn stop_all(&self) {
        for handle in self.registry.drain() {
            let id = handle.account_id().clone();
            info!("Stopping account {}", id);
            handle.stop();
            self.status.update(&id, StatusPatch::stopped());
        }
    }

    pub fn is_connected(&self, account: &AccountId) -> bool {
        self.registry.is_connected(account)
    }

    pub fn send(&self, account: &AccountId, frame: OutboundFrame) -> Result<(), SendError> {
        self.registry.send(account, frame)
    }

    /// Chat message to `to`, or to the whole channel when `to` is `None`.
    pub fn send_text(
        &self,
        account: &AccountId,
        to: Option<&str>,
        text: impl Into<String>,
    ) -> Result<(), SendError> {
        self.send(
            account,
            OutboundFrame::Message {
                text: text.into(),
                to: to.map(str::to_string),
            },
        )
    }

    pub fn send_stream_chunk(
        &self,
        account: &AccountId,
        stream_id: &str,
        to: Option<&str>,
        text: impl Into<String>,
    ) -> Result<(), SendError> {
        self.send(
            account,
            OutboundFrame::StreamChunk {
                stream_id: stream_id.to_string(),
                text: text.into(),
                to: to.map(str::to_string),
            },
        )
    }

    pub fn send_stream_done(
        &self,
        account: &AccountId,
        stream_id: &str,
        to: Option<&str>,
    ) -> Result<(), SendError> {
        self.send(
            account,
            OutboundFrame::StreamDone {
                stream_id: stream_id.to_string(),
                to: to.map(str::to_string),
            },
        )
    }

    pub fn send_typing(
        &self,
        account: &AccountId,
        to: Option<&str>,
        active: bool,
    ) -> Result<(), SendError> {
        self.send(
            account,
            OutboundFrame::Typing {
                active,
                to: to.map(str::to_string),
            },
        )
    }
}
