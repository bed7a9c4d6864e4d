//! Local hook endpoints
//!
//! Provides [`HttpHookDispatcher`], the HTTP implementation of the
//! [`HookDispatcher`](relay_application::HookDispatcher) port.

mod http;

pub use http::{DEFAULT_HOOK_BASE_PATH, DEFAULT_HOOK_PORT, HttpHookDispatcher};
