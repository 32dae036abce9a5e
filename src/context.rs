//! Per-invocation state threaded through every command.

use crate::config::{Config, ConfigStore, Settings};
use crate::directory::ServiceDirectory;
use crate::error::Result;

/// Settings, the loaded config and the shared HTTP client for one invocation.
///
/// The config is read once when the context is created and written back
/// explicitly with [`AppContext::save`].
#[derive(Debug)]
pub struct AppContext {
    settings: Settings,
    store: ConfigStore,
    config: Config,
    http: reqwest::Client,
}

impl AppContext {
    /// Load the config and build a client bounded by `request_timeout`.
    pub fn load(settings: Settings) -> Result<Self> {
        let http = settings.http_client()?;
        Self::load_with_client(settings, http)
    }

    pub fn load_with_client(settings: Settings, http: reqwest::Client) -> Result<Self> {
        let store = ConfigStore::new(settings.config_path.clone());
        let config = store.load()?;
        Ok(Self {
            settings,
            store,
            config,
            http,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn directory(&self) -> ServiceDirectory {
        ServiceDirectory::new(self.http.clone(), self.settings.directory_url.clone())
    }

    /// Persist the in-memory config, replacing the whole file.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.config)
    }
}
