//! Local hook dispatcher port
//!
//! Out-of-band requests (wake, isolated agent turn) are not chat messages;
//! they are handed to a [`HookDispatcher`] which posts them to the local hook
//! endpoints. Whether hooks may be used at all is decided up front by
//! [`HookAccess`], so a disabled setup never reaches the dispatcher.

use async_trait::async_trait;
use relay_domain::{AgentTurnPayload, HookKind, WakePayload};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by a hook dispatch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// The hook endpoint answered with a status other than 200/202.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("Hook request failed: {0}")]
    Transport(String),
}

/// An out-of-band request ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookRequest {
    Wake(WakePayload),
    Agent(AgentTurnPayload),
}

impl HookRequest {
    pub fn kind(&self) -> HookKind {
        match self {
            HookRequest::Wake(_) => HookKind::Wake,
            HookRequest::Agent(_) => HookKind::Agent,
        }
    }
}

/// Posts out-of-band requests to the local hook endpoints
#[async_trait]
pub trait HookDispatcher: Send + Sync {
    async fn dispatch(&self, request: &HookRequest) -> Result<(), HookError>;
}

/// Whether out-of-band requests can be dispatched.
#[derive(Clone)]
pub enum HookAccess {
    Enabled(Arc<dyn HookDispatcher>),
    /// Hooks are unavailable; carries the reason reported in the ack.
    Disabled(&'static str),
}

impl HookAccess {
    /// Gate `dispatcher` on the local hooks flag and token.
    pub fn new(enabled: bool, token: &str, dispatcher: Arc<dyn HookDispatcher>) -> Self {
        if !enabled {
            HookAccess::Disabled("hooks are disabled")
        } else if token.trim().is_empty() {
            HookAccess::Disabled("hooks token is not configured")
        } else {
            HookAccess::Enabled(dispatcher)
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, HookAccess::Enabled(_))
    }
}

impl std::fmt::Debug for HookAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookAccess::Enabled(_) => f.write_str("HookAccess::Enabled"),
            HookAccess::Disabled(reason) => write!(f, "HookAccess::Disabled({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubHooks;

    #[test]
    fn status_error_mentions_code() {
        let err = HookError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn access_requires_flag_and_token() {
        let hooks = StubHooks::ok();
        assert!(HookAccess::new(true, "secret", hooks.clone()).is_enabled());
        assert!(!HookAccess::new(false, "secret", hooks.clone()).is_enabled());
        assert!(!HookAccess::new(true, " ", hooks).is_enabled());
    }

    #[test]
    fn request_kind() {
        assert_eq!(
            HookRequest::Wake(WakePayload::new("x")).kind(),
            HookKind::Wake
        );
        assert_eq!(
            HookRequest::Agent(AgentTurnPayload::new("x")).kind(),
            HookKind::Agent
        );
    }
}
