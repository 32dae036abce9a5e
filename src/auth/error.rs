use thiserror::Error;

use crate::error::MoveForwardError;

/// Failures of the device-code login flow.
///
/// None of these leave a credential behind; the caller restarts the flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Initiation(String),
    #[error("{0}")]
    Transport(String),
    #[error("Authorization timed out after {attempts} attempts")]
    TimedOut { attempts: u32 },
    #[error("Invalid flow state: {0}")]
    InvalidState(String),
}

impl From<AuthError> for MoveForwardError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Initiation(message) => MoveForwardError::AuthInitiation(message),
            AuthError::Transport(message) => MoveForwardError::AuthTransport(message),
            AuthError::TimedOut { attempts } => MoveForwardError::AuthTimeout { attempts },
            AuthError::InvalidState(message) => MoveForwardError::InvalidState(message),
        }
    }
}
