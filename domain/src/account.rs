//! Resolved account model
//!
//! A [`ResolvedAccount`] is the effective, read-only configuration snapshot
//! for one logical account. It is recomputed from raw configuration on every
//! lookup and captured by the transport at start time; later configuration
//! edits do not reach an already-running connection.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Path appended to endpoints that are configured without one.
pub const CHANNEL_PATH: &str = "/channel";

/// Account id used when the configuration does not name one.
pub const DEFAULT_ACCOUNT_ID: &str = "default";

/// Identifier of a logical account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Creates an AccountId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT_ID)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection timing settings for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSettings {
    /// First reconnect delay; doubles on each consecutive failure
    pub reconnect_base: Duration,
    /// Upper bound for the reconnect delay
    pub reconnect_max: Duration,
    /// Interval between keepalive pings while the connection is open
    pub keepalive: Duration,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            reconnect_base: Duration::from_millis(5_000),
            reconnect_max: Duration::from_millis(60_000),
            keepalive: Duration::from_millis(30_000),
        }
    }
}

/// Effective configuration for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccount {
    pub id: AccountId,
    pub name: String,
    pub enabled: bool,
    pub url: String,
    pub token: String,
    pub settings: AccountSettings,
}

impl ResolvedAccount {
    pub fn new(id: impl Into<AccountId>, url: impl Into<String>, token: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            enabled: true,
            url: url.into(),
            token: token.into(),
            settings: AccountSettings::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_settings(mut self, settings: AccountSettings) -> Self {
        self.settings = settings;
        self
    }

    /// True only when every mandatory field is present.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.token.trim().is_empty()
    }

    /// Check that this account may be started.
    pub fn ensure_startable(&self) -> Result<(), DomainError> {
        if !self.enabled {
            return Err(DomainError::AccountDisabled(self.id.clone()));
        }
        if !self.is_configured() {
            return Err(DomainError::AccountNotConfigured(self.id.clone()));
        }
        for (setting, value) in [
            ("reconnect_base", self.settings.reconnect_base),
            ("keepalive", self.settings.keepalive),
        ] {
            if value.is_zero() {
                return Err(DomainError::ZeroTiming {
                    account: self.id.clone(),
                    setting,
                });
            }
        }
        self.endpoint().map(|_| ())
    }

    /// WebSocket address derived from the configured url.
    ///
    /// `http`/`https` map to `ws`/`wss`. When the url carries no path, the
    /// channel path is inserted ahead of any query or fragment.
    pub fn endpoint(&self) -> Result<String, DomainError> {
        let url = self.url.trim();
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| DomainError::InvalidEndpoint(url.to_string()))?;

        let scheme = match scheme.to_ascii_lowercase().as_str() {
            "ws" | "http" => "ws",
            "wss" | "https" => "wss",
            _ => return Err(DomainError::InvalidEndpoint(url.to_string())),
        };

        let (head, suffix) = rest.split_at(rest.find(['?', '#']).unwrap_or(rest.len()));
        if head.is_empty() || head.starts_with('/') {
            return Err(DomainError::InvalidEndpoint(url.to_string()));
        }

        let has_path = head
            .find('/')
            .is_some_and(|idx| !head[idx..].trim_end_matches('/').is_empty());

        if has_path {
            Ok(format!("{}://{}", scheme, rest))
        } else {
            Ok(format!(
                "{}://{}{}{}",
                scheme,
                head.trim_end_matches('/'),
                CHANNEL_PATH,
                suffix
            ))
        }
    }
}
