//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod connection;
pub mod hook_dispatcher;
pub mod host_pipeline;
pub mod inbound_handler;
pub mod status_board;
pub mod status_sink;
