//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain types on use.

mod accounts;
mod hooks;
mod pipeline;
mod status;

pub use accounts::FileAccountConfig;
pub use hooks::FileHooksConfig;
pub use pipeline::FilePipelineConfig;
pub use status::FileStatusConfig;

use relay_domain::{AccountId, ResolvedAccount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("accounts.{account}: reconnect_base_ms cannot be 0")]
    ZeroReconnectBase { account: String },

    #[error("accounts.{account}: reconnect_max_ms ({max}) is below reconnect_base_ms ({base})")]
    ReconnectMaxBelowBase { account: String, base: u64, max: u64 },

    #[error("accounts.{account}: keepalive_ms cannot be 0")]
    ZeroKeepalive { account: String },

    #[error("hooks.base_path must start with '/', got '{0}'")]
    InvalidHookBasePath(String),

    #[error("{section}.timeout_seconds cannot be 0")]
    InvalidTimeout { section: &'static str },

    #[error("pipeline.channel cannot be empty")]
    EmptyChannel,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Local hook endpoints
    pub hooks: FileHooksConfig,
    /// Host pipeline endpoint
    pub pipeline: FilePipelineConfig,
    /// Status reporting
    pub status: FileStatusConfig,
    /// Gateway accounts keyed by account id
    pub accounts: BTreeMap<String, FileAccountConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if !self.hooks.base_path.starts_with('/') {
            issues.push(ConfigValidationError::InvalidHookBasePath(
                self.hooks.base_path.clone(),
            ));
        }
        if self.hooks.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout { section: "hooks" });
        }
        if self.pipeline.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout {
                section: "pipeline",
            });
        }
        if self.pipeline.channel.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyChannel);
        }

        for (id, account) in &self.accounts {
            if account.reconnect_base_ms == 0 {
                issues.push(ConfigValidationError::ZeroReconnectBase {
                    account: id.clone(),
                });
            } else if account.reconnect_max_ms < account.reconnect_base_ms {
                issues.push(ConfigValidationError::ReconnectMaxBelowBase {
                    account: id.clone(),
                    base: account.reconnect_base_ms,
                    max: account.reconnect_max_ms,
                });
            }
            if account.keepalive_ms == 0 {
                issues.push(ConfigValidationError::ZeroKeepalive {
                    account: id.clone(),
                });
            }
        }

        issues
    }

    /// Configured account ids, sorted.
    pub fn account_ids(&self) -> Vec<AccountId> {
        self.accounts.keys().map(AccountId::new).collect()
    }

    /// Effective settings for `id`.
    ///
    /// An id with no `[accounts.<id>]` table resolves to an unconfigured
    /// account, which the supervisor refuses to start.
    pub fn resolve_account(&self, id: &AccountId) -> ResolvedAccount {
        let Some(raw) = self.accounts.get(id.as_str()) else {
            return ResolvedAccount::new(id.clone(), "", "");
        };

        let name = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(id.as_str())
            .to_string();

        ResolvedAccount::new(id.clone(), raw.url.trim(), raw.token.trim())
            .with_name(name)
            .with_enabled(raw.enabled)
            .with_settings(raw.settings())
    }
}
