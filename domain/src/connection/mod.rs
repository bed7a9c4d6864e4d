//! Connection lifecycle.
//!
//! - [`policy::ReconnectPolicy`]: capped exponential backoff
//! - [`lifecycle::ConnectionLifecycle`]: per-connection state machine

pub mod lifecycle;
pub mod policy;
