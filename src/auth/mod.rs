//! Device-code login flow and the credential it produces.

pub mod credential;
pub mod device_code;
pub mod error;
pub mod flow;

pub use credential::Credential;
pub use device_code::{
    FlowState, PendingAuthorization, PollSettings, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};
pub use error::AuthError;
pub use flow::DeviceAuthFlow;
