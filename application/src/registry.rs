//! Account/connection registry
//!
//! Maps each account id to its live connection so outbound sends can find
//! it. Only account start (insert) and stop (remove) mutate the map.

use crate::ports::connection::{ConnectionHandle, ConnectionLink, SendError};
use relay_domain::{AccountId, OutboundFrame};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Owned map from account id to connection handle.
///
/// Uses `std::sync::RwLock`; the lock is only held for map lookups and
/// updates, never across a send or an await.
#[derive(Default)]
pub struct ConnectionRegistry {
    entries: RwLock<HashMap<AccountId, Arc<dyn ConnectionHandle>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under its account id, returning the displaced entry.
    pub fn insert(&self, handle: Arc<dyn ConnectionHandle>) -> Option<Arc<dyn ConnectionHandle>> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(handle.account_id().clone(), handle)
    }

    pub fn remove(&self, account: &AccountId) -> Option<Arc<dyn ConnectionHandle>> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(account)
    }

    pub fn get(&self, account: &AccountId) -> Option<Arc<dyn ConnectionHandle>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(account).cloned()
    }

    /// True when an entry exists and its connection is open.
    pub fn is_connected(&self, account: &AccountId) -> bool {
        self.get(account).is_some_and(|h| h.is_connected())
    }

    /// Send a frame on `account`'s connection.
    ///
    /// A missing entry and a closed connection both yield
    /// [`SendError::NotConnected`].
    pub fn send(&self, account: &AccountId, frame: OutboundFrame) -> Result<(), SendError> {
        match self.get(account) {
            Some(handle) if handle.is_connected() => handle.send(frame),
            _ => Err(SendError::NotConnected(account.clone())),
        }
    }

    /// Registered account ids, sorted.
    pub fn account_ids(&self) -> Vec<AccountId> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<AccountId> = entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Remove and return every entry.
    pub fn drain(&self) -> Vec<Arc<dyn ConnectionHandle>> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.drain().map(|(_, handle)| handle).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingLink;

    #[test]
    fn send_succeeds_only_when_registered_and_connected() {
        let registry = ConnectionRegistry::new();
        let a = AccountId::new("a");

        assert_eq!(
            registry.send(&a, OutboundFrame::broadcast("x")),
            Err(SendError::NotConnected(a.clone()))
        );

        let link = RecordingLink::disconnected("a");
        registry.insert(link.clone());
        assert_eq!(
            registry.send(&a, OutboundFrame::broadcast("x")),
            Err(SendError::NotConnected(a.clone()))
        );
        assert_eq!(link.send_attempts(), 0);

        link.set_connected(true);
        assert!(registry.send(&a, OutboundFrame::broadcast("x")).is_ok());
        assert_eq!(link.sent(), vec![OutboundFrame::broadcast("x")]);
    }

    #[test]
    fn not_connected_error_names_account() {
        let registry = ConnectionRegistry::new();
        let err = registry
            .send(&AccountId::new("ops-bot"), OutboundFrame::Ping)
            .unwrap_err();
        assert!(err.to_string().contains("ops-bot"));
    }

    #[test]
    fn insert_overwrites_and_returns_previous() {
        let registry = ConnectionRegistry::new();
        let first = RecordingLink::connected("a");
        let second = RecordingLink::connected("a");

        assert!(registry.insert(first.clone()).is_none());
        let displaced = registry.insert(second.clone()).unwrap();
        displaced.stop();

        assert_eq!(first.stops(), 1);
        assert_eq!(registry.len(), 1);
        registry
            .send(&AccountId::new("a"), OutboundFrame::Ping)
            .unwrap();
        assert_eq!(second.sent(), vec![OutboundFrame::Ping]);
        assert!(first.sent().is_empty());
    }

    #[test]
    fn remove_and_drain() {
        let registry = ConnectionRegistry::new();
        registry.insert(RecordingLink::connected("b"));
        registry.insert(RecordingLink::connected("a"));
        assert_eq!(
            registry.account_ids(),
            vec![AccountId::new("a"), AccountId::new("b")]
        );

        assert!(registry.remove(&AccountId::new("a")).is_some());
        assert!(registry.remove(&AccountId::new("a")).is_none());
        assert!(!registry.is_connected(&AccountId::new("a")));
        assert!(registry.is_connected(&AccountId::new("b")));

        assert_eq!(registry.drain().len(), 1);
        assert!(registry.is_empty());
    }
}
