//! Local hooks configuration from TOML (`[hooks]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw hooks configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHooksConfig {
    /// Allow wake/agent requests to reach the local hook endpoints
    pub enabled: bool,
    /// Bearer token for the hook endpoints; hooks stay off while empty
    pub token: String,
    /// Loopback port of the hook server
    pub port: u16,
    /// Path prefix of the hook endpoints
    pub base_path: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FileHooksConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: String::new(),
            port: 18789,
            base_path: "/hooks".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl FileHooksConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
