use std::path::PathBuf;
use std::time::Duration;

use super::store::ConfigStore;
use crate::directory::DEFAULT_DIRECTORY_URL;
use crate::error::{MoveForwardError, Result};

const DEFAULT_FORWARD_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime settings (layered: CLI flags > env > defaults).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Location of the persisted config document.
    pub config_path: PathBuf,
    /// Base URL of the service directory.
    pub directory_url: String,
    /// Upper bound for a single forward POST.
    pub forward_timeout: Duration,
    /// Upper bound for directory and login requests.
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: ConfigStore::default_path(),
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            forward_timeout: DEFAULT_FORWARD_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Settings {
    /// Load from environment variables (MOVE_FORWARD_CONFIG, etc.).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = value("MOVE_FORWARD_CONFIG") {
            settings.config_path = PathBuf::from(path);
        }
        if let Some(url) = value("MOVE_FORWARD_SERVICES_URL") {
            settings.directory_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = value("MOVE_FORWARD_FORWARD_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            settings.forward_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = value("MOVE_FORWARD_REQUEST_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            settings.request_timeout = Duration::from_secs(secs);
        }
        settings
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = path;
        self
    }

    /// HTTP client shared by one invocation.
    ///
    /// Every request is bounded by `request_timeout`, so a stalled service
    /// surfaces as a transport error instead of hanging.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|err| MoveForwardError::HttpClient(err.to_string()))
    }
}
