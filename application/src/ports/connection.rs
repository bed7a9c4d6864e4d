//! Connection ports
//!
//! [`ConnectionLink`] is the narrow view of a live connection the router
//! and reply handles need. [`ConnectionHandle`] adds lifecycle control and is
//! what the registry stores. [`Connector`] builds handles for accounts; the
//! WebSocket transport is its production implementation.

use crate::ports::inbound_handler::InboundHandler;
use relay_domain::{AccountId, ConnectionState, OutboundFrame, ResolvedAccount};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors returned when an outbound frame cannot be sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// No connection is registered for the account, or it is not open.
    #[error("Account {0} is not connected")]
    NotConnected(AccountId),

    #[error("Failed to encode frame: {0}")]
    Encode(String),
}

/// Send side of a connection.
pub trait ConnectionLink: Send + Sync {
    /// Account this connection belongs to
    fn account_id(&self) -> &AccountId;

    /// Current liveness flag
    fn is_connected(&self) -> bool;

    /// Transmit a frame now, or fail with [`SendError::NotConnected`].
    ///
    /// Never blocks and never queues a frame for later delivery.
    fn send(&self, frame: OutboundFrame) -> Result<(), SendError>;
}

/// A connection whose lifecycle can be driven.
pub trait ConnectionHandle: ConnectionLink {
    /// Begin connecting in the background and return immediately.
    ///
    /// Cancelling `cancel` stops the connection.
    fn start(&self, cancel: CancellationToken);

    /// Stop the connection permanently. Idempotent.
    fn stop(&self);

    /// Current lifecycle state
    fn state(&self) -> ConnectionState;
}

/// Factory for connections.
pub trait Connector: Send + Sync {
    /// Build (but do not start) a connection for `account`, feeding every
    /// inbound event to `handler`.
    fn connect(
        &self,
        account: ResolvedAccount,
        handler: Arc<dyn InboundHandler>,
    ) -> Arc<dyn ConnectionHandle>;
}
