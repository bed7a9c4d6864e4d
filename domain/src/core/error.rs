//! Domain error types

use crate::account::AccountId;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Account {0} is not configured (endpoint url and token are required)")]
    AccountNotConfigured(AccountId),

    #[error("Account {0} is disabled")]
    AccountDisabled(AccountId),

    #[error("Invalid endpoint url: {0}")]
    InvalidEndpoint(String),

    #[error("Account {account}: {setting} cannot be 0")]
    ZeroTiming {
        account: AccountId,
        setting: &'static str,
    },

    #[error("Connection for account {0} has been stopped")]
    Stopped(AccountId),
}

impl DomainError {
    /// Check if this error is a configuration problem (fatal to a start attempt)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::AccountNotConfigured(_)
                | DomainError::AccountDisabled(_)
                | DomainError::InvalidEndpoint(_)
                | DomainError::ZeroTiming { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_display_names_account() {
        let error = DomainError::AccountNotConfigured(AccountId::new("alpha"));
        assert!(error.to_string().contains("alpha"));
    }

    #[test]
    fn test_is_configuration_check() {
        assert!(DomainError::AccountDisabled(AccountId::new("a")).is_configuration());
        assert!(DomainError::InvalidEndpoint("ftp://x".into()).is_configuration());
        assert!(!DomainError::Stopped(AccountId::new("a")).is_configuration());
    }
}
