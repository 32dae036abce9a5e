//! Persisted CLI state and runtime settings.

pub mod service;
pub mod settings;
pub mod store;

pub use service::ServiceEndpoint;
pub use settings::Settings;
pub use store::ConfigStore;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Credential;
use crate::error::{MoveForwardError, Result};
use crate::relay::RelayTarget;

/// Everything move-forward remembers between invocations.
///
/// Serialized as camelCase JSON. Empty strings read from older files are
/// treated the same as missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_service: Option<String>,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceEndpoint>,
}

impl Config {
    /// The stored credential, if a login has succeeded.
    pub fn credential(&self) -> Option<Credential> {
        let token = non_empty(&self.token)?;
        Some(Credential {
            token: token.to_string(),
            device_id: non_empty(&self.device_id).unwrap_or_default().to_string(),
            expires_at: self.expire_at,
        })
    }

    pub fn set_credential(&mut self, credential: Credential) {
        self.token = Some(credential.token);
        self.device_id = Some(credential.device_id);
        self.expire_at = credential.expires_at;
    }

    /// Drop the token but keep the device id for the next login.
    pub fn clear_credential(&mut self) {
        self.token = None;
        self.expire_at = None;
    }

    pub fn device_id(&self) -> Option<&str> {
        non_empty(&self.device_id)
    }

    /// The service selected by the last `setup`.
    pub fn current_service(&self) -> Result<&ServiceEndpoint> {
        let name = non_empty(&self.current_service).ok_or(MoveForwardError::NoServiceConfigured)?;
        self.services
            .get(name)
            .ok_or_else(|| MoveForwardError::ServiceNotFound(name.to_string()))
    }

    /// Remember `endpoint` under `name` and make it the current service.
    pub fn select_service(&mut self, name: &str, endpoint: ServiceEndpoint) {
        self.services.insert(name.to_string(), endpoint);
        self.current_service = Some(name.to_string());
    }

    pub fn relay_target(&self) -> Option<RelayTarget> {
        non_empty(&self.forward_url).map(RelayTarget::new)
    }

    /// Pick the forward destination for a `listen` run.
    ///
    /// An explicit URL wins and replaces the saved one; otherwise the saved URL
    /// is used. The flag reports whether the config changed and needs saving.
    pub fn resolve_relay_target(&mut self, explicit: Option<&str>) -> Result<(RelayTarget, bool)> {
        match explicit.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => {
                let changed = non_empty(&self.forward_url) != Some(url);
                self.forward_url = Some(url.to_string());
                Ok((RelayTarget::new(url), changed))
            }
            None => self
                .relay_target()
                .map(|target| (target, false))
                .ok_or(MoveForwardError::MissingForwardUrl),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
