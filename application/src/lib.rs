//! Application layer for channel-relay
//!
//! This crate contains the message router, the account supervisor, the
//! connection registry and the port definitions infrastructure implements.
//! It depends only on the domain layer.

pub mod ports;
pub mod registry;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use ports::{
    connection::{ConnectionHandle, ConnectionLink, Connector, SendError},
    hook_dispatcher::{HookAccess, HookDispatcher, HookError, HookRequest},
    host_pipeline::{ChatType, HostPipeline, InboundChatMessage, PipelineError, ReplyHandle},
    inbound_handler::InboundHandler,
    status_board::{AccountStatus, StatusBoard},
    status_sink::{FanoutStatusSink, NoStatus, StatusPatch, StatusSink},
};
pub use registry::ConnectionRegistry;
pub use use_cases::manage_accounts::{AccountSupervisor, StartAccountError};
pub use use_cases::route_inbound::{DEFAULT_CHANNEL, MessageRouter};
