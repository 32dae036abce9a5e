use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access credential issued by a successful device-code login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub device_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// A credential without expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}
