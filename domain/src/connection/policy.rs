//! Reconnect backoff policy

use crate::account::AccountSettings;
use std::time::Duration;

/// Capped exponential backoff: `delay(n) = min(base * 2^(n-1), max)`.
///
/// There is no give-up threshold. A connection retries until it is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    base: Duration,
    max: Duration,
}

impl ReconnectPolicy {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Delay before reconnect attempt `attempt` (1-based; 0 is treated as 1).
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        2u32.checked_pow(exponent)
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

impl From<&AccountSettings> for ReconnectPolicy {
    fn from(settings: &AccountSettings) -> Self {
        Self::new(settings.reconnect_base, settings.reconnect_max)
    }
}
