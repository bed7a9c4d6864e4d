//! Infrastructure layer for channel-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the WebSocket gateway transport, the HTTP
//! hook dispatcher and host pipeline, the JSONL status log, and
//! configuration file loading.

pub mod config;
pub mod hooks;
pub mod logging;
pub mod pipeline;
pub mod websocket;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAccountConfig, FileConfig, FileHooksConfig,
    FilePipelineConfig, FileStatusConfig,
};
pub use hooks::{DEFAULT_HOOK_BASE_PATH, DEFAULT_HOOK_PORT, HttpHookDispatcher};
pub use logging::JsonlStatusLog;
pub use pipeline::HttpHostPipeline;
pub use websocket::{TransportError, WebSocketConnector, WebSocketTransport};
