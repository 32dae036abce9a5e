//! Service directory lookups.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ServiceEndpoint;
use crate::error::{MoveForwardError, Result};

pub const DEFAULT_DIRECTORY_URL: &str =
    "https://raw.githubusercontent.com/move-forward/services/main";

/// Client for the directory that maps service names to endpoints.
///
/// The directory is a static tree: `index.json` lists the names and
/// `<name>.json` describes one service.
#[derive(Debug, Clone)]
pub struct ServiceDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceDirectory {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of all services, in directory order.
    pub async fn list_services(&self) -> Result<Vec<String>> {
        let url = format!("{}/index.json", self.base_url);
        let (status, body) = self.get_json::<Vec<String>>(&url).await?;
        body.ok_or_else(|| {
            MoveForwardError::Lookup(format!("failed to fetch services list (status {status})"))
        })
    }

    /// Endpoint description for one service.
    pub async fn fetch_service(&self, name: &str) -> Result<ServiceEndpoint> {
        let name = name.trim();
        if name.is_empty() || name.contains('/') {
            return Err(MoveForwardError::Lookup(format!(
                "invalid service name '{name}'"
            )));
        }
        let url = format!("{}/{name}.json", self.base_url);
        let (status, body) = self.get_json::<ServiceEndpoint>(&url).await?;
        body.ok_or_else(|| {
            MoveForwardError::Lookup(format!("service {name} not found (status {status})"))
        })
    }

    /// `None` body means a non-200 status.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<(StatusCode, Option<T>)> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| MoveForwardError::Lookup(format!("request to {url} failed: {err}")))?;
        let status = resp.status();
        debug!(url, %status, "directory lookup");
        if status != StatusCode::OK {
            return Ok((status, None));
        }
        let body = resp.json::<T>().await.map_err(|err| {
            MoveForwardError::Lookup(format!("invalid response from {url}: {err}"))
        })?;
        Ok((status, Some(body)))
    }
}
