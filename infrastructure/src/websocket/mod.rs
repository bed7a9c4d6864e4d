//! WebSocket transport to the gateway service
//!
//! One [`WebSocketTransport`] per account. Each runs a single background
//! task that owns the socket and drives connect, read, keepalive, outbound
//! writes and event dispatch from one `select!` loop, so inbound events are
//! handled strictly in arrival order.
//!
//! Reconnect decisions come from the domain's
//! [`ConnectionLifecycle`](relay_domain::ConnectionLifecycle); this module
//! only supplies the timers and the socket.

pub mod connector;
pub mod error;
pub mod transport;

pub use connector::WebSocketConnector;
pub use error::TransportError;
pub use transport::WebSocketTransport;
