//! Status configuration from TOML (`[status]` section)

use serde::{Deserialize, Serialize};

/// Raw status configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStatusConfig {
    /// Append every status update to this JSONL file
    pub log_file: Option<String>,
}
