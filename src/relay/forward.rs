use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MoveForwardError, Result};

/// Where relayed events are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayTarget {
    pub forward_url: String,
}

impl RelayTarget {
    pub fn new(forward_url: impl Into<String>) -> Self {
        Self {
            forward_url: forward_url.into(),
        }
    }
}

/// Delivers one event body.
///
/// Errors are reported as [`MoveForwardError::ForwardDelivery`] and never
/// retried by the caller.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, body: &[u8]) -> Result<()>;
}

/// POSTs each event body to the relay target as JSON.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
    target: RelayTarget,
    timeout: Duration,
}

impl HttpForwarder {
    pub fn new(client: reqwest::Client, target: RelayTarget, timeout: Duration) -> Self {
        Self {
            client,
            target,
            timeout,
        }
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, body: &[u8]) -> Result<()> {
        let resp = self
            .client
            .post(&self.target.forward_url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .body(body.to_vec())
            .send()
            .await
            .map_err(|err| MoveForwardError::ForwardDelivery(err.to_string()))?;
        let status = resp.status();
        debug!(url = %self.target.forward_url, %status, "forwarded webhook");
        if !status.is_success() {
            return Err(MoveForwardError::ForwardDelivery(format!(
                "{} responded with status {status}",
                self.target.forward_url
            )));
        }
        Ok(())
    }
}
