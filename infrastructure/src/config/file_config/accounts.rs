//! Account configuration from TOML (`[accounts.<id>]` tables)

use relay_domain::AccountSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw configuration of one gateway account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAccountConfig {
    /// Display name; defaults to the account id
    pub name: Option<String>,
    pub enabled: bool,
    /// Gateway URL (`ws`, `wss`, `http` or `https`)
    pub url: String,
    /// Bearer credential presented on connect
    pub token: String,
    pub reconnect_base_ms: u64,
    pub reconnect_max_ms: u64,
    pub keepalive_ms: u64,
}

impl Default for FileAccountConfig {
    fn default() -> Self {
        let settings = AccountSettings::default();
        Self {
            name: None,
            enabled: true,
            url: String::new(),
            token: String::new(),
            reconnect_base_ms: settings.reconnect_base.as_millis() as u64,
            reconnect_max_ms: settings.reconnect_max.as_millis() as u64,
            keepalive_ms: settings.keepalive.as_millis() as u64,
        }
    }
}

impl FileAccountConfig {
    pub fn settings(&self) -> AccountSettings {
        AccountSettings {
            reconnect_base: Duration::from_millis(self.reconnect_base_ms),
            reconnect_max: Duration::from_millis(self.reconnect_max_ms),
            keepalive: Duration::from_millis(self.keepalive_ms),
        }
    }
}
