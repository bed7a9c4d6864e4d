//! Status sink port
//!
//! Components report health as partial updates ([`StatusPatch`]); the sink
//! owner aggregates or persists them. Operators observe connection health
//! only through this sink and the logs.

use chrono::{DateTime, Utc};
use relay_domain::AccountId;
use serde::Serialize;
use std::sync::Arc;

/// A partial status update. `None` fields leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_connected_at: Option<DateTime<Utc>>,
    /// `Some(None)` clears the last error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_stop_at: Option<DateTime<Utc>>,
}

impl StatusPatch {
    /// Account started.
    pub fn started() -> Self {
        Self {
            running: Some(true),
            last_start_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Account stopped.
    pub fn stopped() -> Self {
        Self {
            running: Some(false),
            connected: Some(false),
            last_stop_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Transport-level connection opened.
    pub fn opened() -> Self {
        Self {
            connected: Some(true),
            last_connected_at: Some(Utc::now()),
            last_error: Some(None),
            ..Default::default()
        }
    }

    /// The channel confirmed the connection.
    pub fn connected() -> Self {
        Self {
            connected: Some(true),
            last_error: Some(None),
            ..Default::default()
        }
    }

    /// Connection lost, optionally with the cause.
    pub fn disconnected(error: Option<String>) -> Self {
        Self {
            connected: Some(false),
            last_error: error.map(Some),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            last_error: Some(Some(message.into())),
            ..Default::default()
        }
    }
}

/// Receives status updates.
///
/// `update` is synchronous and non-fallible so reporting never disrupts the
/// connection loop.
pub trait StatusSink: Send + Sync {
    fn update(&self, account: &AccountId, patch: StatusPatch);
}

/// No-op implementation for tests and when status reporting is not needed.
pub struct NoStatus;

impl StatusSink for NoStatus {
    fn update(&self, _account: &AccountId, _patch: StatusPatch) {}
}

/// Forwards every update to several sinks.
pub struct FanoutStatusSink {
    delegates: Vec<Arc<dyn StatusSink>>,
}

impl FanoutStatusSink {
    pub fn new(delegates: Vec<Arc<dyn StatusSink>>) -> Self {
        Self { delegates }
    }
}

impl StatusSink for FanoutStatusSink {
    fn update(&self, account: &AccountId, patch: StatusPatch) {
        for d in &self.delegates {
            d.update(account, patch.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::status_board::StatusBoard;

    #[test]
    fn connected_patch_clears_error() {
        let patch = StatusPatch::connected();
        assert_eq!(patch.connected, Some(true));
        assert_eq!(patch.last_error, Some(None));
    }

    #[test]
    fn disconnected_without_cause_keeps_error() {
        assert_eq!(StatusPatch::disconnected(None).last_error, None);
        assert_eq!(
            StatusPatch::disconnected(Some("reset".into())).last_error,
            Some(Some("reset".into()))
        );
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let json = serde_json::to_value(StatusPatch::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"last_error": "boom"}));

        let json = serde_json::to_value(StatusPatch::connected()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"connected": true, "last_error": null})
        );
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let first = Arc::new(StatusBoard::new());
        let second = Arc::new(StatusBoard::new());
        let fanout = FanoutStatusSink::new(vec![
            first.clone() as Arc<dyn StatusSink>,
            second.clone() as Arc<dyn StatusSink>,
        ]);
        let account = AccountId::new("a");

        fanout.update(&account, StatusPatch::started());

        assert!(first.get(&account).unwrap().running);
        assert!(second.get(&account).unwrap().running);
    }
}
