//! Device-code session types.

use std::time::Duration;

use strum::Display;

/// Poll interval used when a service does not configure a positive one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Attempt budget used when a service does not configure a positive one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Device code handed out by the login initiation, waiting to be polled.
///
/// Lives in memory only and is consumed by polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuthorization {
    pub device_code: String,
    pub verification_uri: String,
}

/// Pace and budget of the token polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollSettings {
    /// Zero values fall back to the defaults.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval: if interval.is_zero() {
                DEFAULT_POLL_INTERVAL
            } else {
                interval
            },
            max_attempts: if max_attempts == 0 {
                DEFAULT_MAX_ATTEMPTS
            } else {
                max_attempts
            },
        }
    }

    /// Build from a service's `pollIntervalSeconds` / `maxRetries`.
    ///
    /// Missing or non-positive values fall back to the defaults.
    pub fn from_service(poll_interval_secs: Option<i64>, max_retries: Option<i64>) -> Self {
        let interval = poll_interval_secs
            .filter(|secs| *secs > 0)
            .map(|secs| Duration::from_secs(secs as u64))
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        let max_attempts = max_retries
            .filter(|retries| *retries > 0)
            .map(|retries| u32::try_from(retries).unwrap_or(u32::MAX))
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        Self {
            interval,
            max_attempts,
        }
    }
}

/// Lifecycle of one device-code login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FlowState {
    Idle,
    Initiated,
    Polling,
    Authorized,
    TimedOut,
    Failed,
}

impl FlowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Authorized | Self::TimedOut | Self::Failed)
    }
}
