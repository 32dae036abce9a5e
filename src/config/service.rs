use serde::{Deserialize, Serialize};

use crate::auth::PollSettings;

/// A webhook service as described by the service directory.
///
/// Stored per service name in the config file; refreshed only by `setup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    pub name: String,
    pub api_base_url: String,
    pub web_socket_base_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i64>,
}

impl ServiceEndpoint {
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings::from_service(self.poll_interval_seconds, self.max_retries)
    }
}
