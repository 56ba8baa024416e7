//! Connection lifecycle state machine.
//!
//! Models one push-channel connection as explicit states with
//! transitions driven by timeouts and error events. Reconnection backs
//! off exponentially and gives up after a bounded attempt count.

use std::time::Duration;

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Waiting out a backoff delay before attempt `attempt + 1`.
    Backoff { attempt: u32 },
    /// Max reconnect attempts reached; terminal.
    Failed,
}

/// Backoff and retry policy for one connection.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the given (zero-based) retry attempt, doubling each
    /// time: 1s, 2s, 4s, ...
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Drives `ConnectionState` transitions for one connection.
#[derive(Debug)]
pub struct ConnectionMachine {
    state: ConnectionState,
    policy: ReconnectPolicy,
}

impl ConnectionMachine {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            policy,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == ConnectionState::Failed
    }

    /// An attempt to open the channel has started.
    pub fn on_connect_started(&mut self) {
        if !self.is_terminal() {
            self.state = ConnectionState::Connecting;
        }
    }

    /// The channel is up. Resets the attempt counter.
    pub fn on_established(&mut self) {
        if !self.is_terminal() {
            self.state = ConnectionState::Connected;
        }
    }

    /// The channel errored or timed out.
    ///
    /// Returns the backoff delay to wait before the next attempt, or
    /// `None` once the attempt budget is spent and the state is
    /// terminally `Failed`.
    pub fn on_error(&mut self) -> Option<Duration> {
        let next_attempt = match self.state {
            ConnectionState::Backoff { attempt } => attempt + 1,
            ConnectionState::Failed => return None,
            _ => 0,
        };
        if next_attempt >= self.policy.max_attempts {
            self.state = ConnectionState::Failed;
            return None;
        }
        self.state = ConnectionState::Backoff {
            attempt: next_attempt,
        };
        Some(self.policy.delay(next_attempt))
    }
}
