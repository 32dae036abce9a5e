//! Error types for move-forward.

use thiserror::Error;

/// Primary error type for every move-forward operation.
///
/// Everything except [`MoveForwardError::ForwardDelivery`] is fatal to the
/// command that produced it.
#[derive(Error, Debug)]
pub enum MoveForwardError {
    #[error("Config error: {0}")]
    ConfigIo(String),

    #[error("Service lookup failed: {0}")]
    Lookup(String),

    #[error("Login failed: {0}")]
    AuthInitiation(String),

    #[error("Token polling failed: {0}")]
    AuthTransport(String),

    #[error("Authorization timed out after {attempts} attempts. Please try again")]
    AuthTimeout { attempts: u32 },

    #[error("Failed to connect to WebSocket: {0}")]
    RelayConnection(String),

    #[error("Webhook listener closed unexpectedly: {0}")]
    RelayRead(String),

    #[error("Failed to forward webhook: {0}")]
    ForwardDelivery(String),

    #[error("No service configured")]
    NoServiceConfigured,

    #[error("Service {0} not found in local configuration")]
    ServiceNotFound(String),

    #[error("You are not logged in")]
    NotLoggedIn,

    #[error("Saved credential expired")]
    CredentialExpired,

    #[error("No forward URL given and none saved")]
    MissingForwardUrl,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl MoveForwardError {
    /// Whether this error must end the current command.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ForwardDelivery(_))
    }

    /// Whether logging in again is the way out of this error.
    pub fn needs_login(&self) -> bool {
        matches!(self, Self::NotLoggedIn | Self::CredentialExpired)
    }

    /// Whether running `setup` is the way out of this error.
    pub fn needs_setup(&self) -> bool {
        matches!(self, Self::NoServiceConfigured | Self::ServiceNotFound(_))
    }
}

impl From<std::io::Error> for MoveForwardError {
    fn from(error: std::io::Error) -> Self {
        Self::ConfigIo(error.to_string())
    }
}

impl From<serde_json::Error> for MoveForwardError {
    fn from(error: serde_json::Error) -> Self {
        Self::ConfigIo(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MoveForwardError>;
