//! In-memory status aggregation.
//!
//! [`StatusBoard`] folds [`StatusPatch`]es into one [`AccountStatus`] per
//! account, for display and health checks.

use super::status_sink::{StatusPatch, StatusSink};
use chrono::{DateTime, Utc};
use relay_domain::AccountId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Aggregated status of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountStatus {
    pub account_id: AccountId,
    pub running: bool,
    pub connected: bool,
    pub last_connected_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_start_at: Option<DateTime<Utc>>,
    pub last_stop_at: Option<DateTime<Utc>>,
}

impl AccountStatus {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            running: false,
            connected: false,
            last_connected_at: None,
            last_error: None,
            last_start_at: None,
            last_stop_at: None,
        }
    }

    /// Apply a partial update.
    pub fn apply(&mut self, patch: StatusPatch) {
        if let Some(running) = patch.running {
            self.running = running;
        }
        if let Some(connected) = patch.connected {
            self.connected = connected;
        }
        if let Some(at) = patch.last_connected_at {
            self.last_connected_at = Some(at);
        }
        if let Some(error) = patch.last_error {
            self.last_error = error;
        }
        if let Some(at) = patch.last_start_at {
            self.last_start_at = Some(at);
        }
        if let Some(at) = patch.last_stop_at {
            self.last_stop_at = Some(at);
        }
    }
}

/// Status sink that keeps the latest status of every account in memory.
#[derive(Default)]
pub struct StatusBoard {
    accounts: RwLock<BTreeMap<AccountId, AccountStatus>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, account: &AccountId) -> Option<AccountStatus> {
        let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
        accounts.get(account).cloned()
    }

    /// Every known account, ordered by id.
    pub fn snapshot(&self) -> Vec<AccountStatus> {
        let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
        accounts.values().cloned().collect()
    }
}

impl StatusSink for StatusBoard {
    fn update(&self, account: &AccountId, patch: StatusPatch) {
        let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
        accounts
            .entry(account.clone())
            .or_insert_with(|| AccountStatus::new(account.clone()))
            .apply(patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patches_accumulate() {
        let board = StatusBoard::new();
        let a = AccountId::new("a");

        board.update(&a, StatusPatch::started());
        board.update(&a, StatusPatch::opened());
        board.update(&a, StatusPatch::connected());

        let status = board.get(&a).unwrap();
        assert!(status.running);
        assert!(status.connected);
        assert!(status.last_connected_at.is_some());
        assert!(status.last_start_at.is_some());
        assert_eq!(status.last_error, None);
    }

    #[test]
    fn error_then_reconnect_clears_error() {
        let board = StatusBoard::new();
        let a = AccountId::new("a");

        board.update(&a, StatusPatch::disconnected(Some("refused".into())));
        assert_eq!(board.get(&a).unwrap().last_error.as_deref(), Some("refused"));

        board.update(&a, StatusPatch::disconnected(None));
        assert_eq!(board.get(&a).unwrap().last_error.as_deref(), Some("refused"));

        board.update(&a, StatusPatch::connected());
        assert_eq!(board.get(&a).unwrap().last_error, None);
    }

    #[test]
    fn stop_marks_not_running_and_disconnected() {
        let board = StatusBoard::new();
        let a = AccountId::new("a");
        board.update(&a, StatusPatch::started());
        board.update(&a, StatusPatch::connected());
        board.update(&a, StatusPatch::stopped());

        let status = board.get(&a).unwrap();
        assert!(!status.running);
        assert!(!status.connected);
        assert!(status.last_stop_at.is_some());
    }

    #[test]
    fn snapshot_is_sorted_by_account() {
        let board = StatusBoard::new();
        board.update(&AccountId::new("b"), StatusPatch::started());
        board.update(&AccountId::new("a"), StatusPatch::started());

        let ids: Vec<String> = board
            .snapshot()
            .into_iter()
            .map(|s| s.account_id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
