//! Connection lifecycle state machine.
//!
//! [`ConnectionLifecycle`] holds the attempt counter, liveness and the
//! terminal stopped flag for one connection. It performs no I/O and owns no
//! timers: the transport reports what happened (`on_open`, `on_close`) and
//! asks what to do next (`schedule_reconnect`), then sleeps on its own clock.
//!
//! ```text
//! Idle → Connecting → Open → Closed|Errored → Reconnecting → Connecting → …
//!   └──────────────── stop() from any state ───────────────→ Stopped
//! ```

use crate::connection::policy::ReconnectPolicy;
use std::time::Duration;

/// Observable state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Open,
    /// The remote side closed the connection
    Closed,
    /// The connection failed or could not be established
    Errored,
    /// Waiting for the backoff delay to elapse
    Reconnecting,
    /// Terminal. No further attempts are made.
    Stopped,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
            ConnectionState::Errored => "errored",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the transport should do after a connection was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Try again after `delay`.
    Retry { attempt: u32, delay: Duration },
    /// The connection was stopped; do nothing.
    Halt,
}

/// Per-connection state machine.
#[derive(Debug, Clone)]
pub struct ConnectionLifecycle {
    state: ConnectionState,
    attempt: u32,
    policy: ReconnectPolicy,
    last_error: Option<String>,
}

impl ConnectionLifecycle {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            state: ConnectionState::Idle,
            attempt: 0,
            policy,
            last_error: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Consecutive failed attempts since the last successful open.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn is_stopped(&self) -> bool {
        self.state == ConnectionState::Stopped
    }

    /// Enter `Connecting`. Returns `false` once stopped.
    pub fn begin_connect(&mut self) -> bool {
        if self.is_stopped() {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    /// The connection opened. Resets the backoff. Returns `false` once stopped.
    pub fn on_open(&mut self) -> bool {
        if self.is_stopped() {
            return false;
        }
        self.state = ConnectionState::Open;
        self.attempt = 0;
        self.last_error = None;
        true
    }

    /// The connection closed (`error == None`) or failed.
    ///
    /// Has no effect once stopped.
    pub fn on_close(&mut self, error: Option<String>) {
        if self.is_stopped() {
            return;
        }
        self.state = if error.is_some() {
            ConnectionState::Errored
        } else {
            ConnectionState::Closed
        };
        if error.is_some() {
            self.last_error = error;
        }
    }

    /// Decide whether and when to reconnect.
    ///
    /// The stopped flag is checked here, immediately before a retry is
    /// scheduled, so a close racing with `stop()` never produces a retry.
    pub fn schedule_reconnect(&mut self) -> ReconnectDecision {
        if self.is_stopped() {
            return ReconnectDecision::Halt;
        }
        self.attempt = self.attempt.saturating_add(1);
        self.state = ConnectionState::Reconnecting;
        ReconnectDecision::Retry {
            attempt: self.attempt,
            delay: self.policy.delay(self.attempt),
        }
    }

    /// Enter the terminal state. Returns `true` only on the first call.
    pub fn stop(&mut self) -> bool {
        if self.is_stopped() {
            return false;
        }
        self.state = ConnectionState::Stopped;
        true
    }
}
