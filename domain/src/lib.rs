//! Domain layer for channel-relay
//!
//! This crate contains the wire protocol spoken with the remote gateway
//! service, the resolved account model, and the connection lifecycle state
//! machine. It has no dependencies on infrastructure or I/O concerns.
//!
//! # Core Concepts
//!
//! ## Connection
//!
//! One logical link to the gateway service for one account. Its lifecycle
//! (`Idle → Connecting → Open → Closed → Reconnecting → … → Stopped`) and
//! capped exponential backoff live in [`connection::ConnectionLifecycle`],
//! a pure object that the transport drives with real timers.
//!
//! ## Protocol
//!
//! Inbound events and outbound frames are closed sum types tagged by a
//! `"type"` field. Adding a wire message kind means adding a variant, which
//! forces every `match` in the router to handle it.

pub mod account;
pub mod connection;
pub mod core;
pub mod hook;
pub mod protocol;

// Re-export commonly used types
pub use account::{AccountId, AccountSettings, DEFAULT_ACCOUNT_ID, ResolvedAccount};
pub use connection::{
    lifecycle::{ConnectionLifecycle, ConnectionState, ReconnectDecision},
    policy::ReconnectPolicy,
};
pub use core::error::DomainError;
pub use hook::{AgentTurnPayload, DEFAULT_AGENT_NAME, HookKind, WakeMode, WakePayload};
pub use protocol::{
    error::ProtocolError,
    inbound::{ChatMessage, InboundEvent, Participant},
    outbound::{AckStatus, OutboundFrame},
};
