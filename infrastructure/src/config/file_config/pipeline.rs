//! Host pipeline configuration from TOML (`[pipeline]` section)

use relay_application::DEFAULT_CHANNEL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw host pipeline configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Endpoint chat messages are POSTed to
    pub url: Option<String>,
    /// Optional bearer token for the endpoint
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Channel name reported with every chat message
    pub channel: String,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_seconds: 30,
            channel: DEFAULT_CHANNEL.to_string(),
        }
    }
}

impl FilePipelineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
