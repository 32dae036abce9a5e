use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::credential::Credential;
use super::device_code::{FlowState, PendingAuthorization, PollSettings};
use super::error::AuthError;

/// Device-code login against a service's API.
///
/// One flow object drives one login: `initiate_login` then `poll_for_token`.
/// Terminal states are final; start a new flow to try again.
///
/// # Example
/// ```no_run
/// use move_forward::auth::{DeviceAuthFlow, PollSettings};
///
/// # async fn example() -> Result<(), move_forward::auth::AuthError> {
/// let mut flow = DeviceAuthFlow::new(
///     reqwest::Client::new(),
///     "https://api.example.com",
///     "device-1",
/// );
/// let pending = flow.initiate_login("my-laptop").await?;
/// println!("Open {}", pending.verification_uri);
/// let credential = flow.poll_for_token(pending, PollSettings::default()).await?;
/// # let _ = credential;
/// # Ok(())
/// # }
/// ```
pub struct DeviceAuthFlow {
    client: reqwest::Client,
    device_login_url: String,
    token_url: String,
    device_id: String,
    state: FlowState,
}

impl DeviceAuthFlow {
    pub fn new(
        client: reqwest::Client,
        api_base_url: &str,
        device_id: impl Into<String>,
    ) -> Self {
        let base = api_base_url.trim_end_matches('/');
        Self {
            client,
            device_login_url: format!("{base}/device-login"),
            token_url: format!("{base}/token"),
            device_id: device_id.into(),
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Ask the service for a device code on behalf of `host`.
    pub async fn initiate_login(&mut self, host: &str) -> Result<PendingAuthorization, AuthError> {
        self.expect_state(FlowState::Idle, "initiate_login")?;
        match self.request_device_code(host).await {
            Ok(pending) => {
                self.state = FlowState::Initiated;
                info!(host, "device login initiated");
                Ok(pending)
            }
            Err(err) => {
                self.state = FlowState::Failed;
                Err(err)
            }
        }
    }

    /// Poll until the device code is approved or the attempt budget runs out.
    ///
    /// Each attempt sleeps one interval before asking. Non-success statuses,
    /// bodies without a non-empty `token` and tokens whose `expiresAt` has
    /// already passed count as pending; a request that cannot be sent at all
    /// ends the flow.
    pub async fn poll_for_token(
        &mut self,
        pending: PendingAuthorization,
        settings: PollSettings,
    ) -> Result<Credential, AuthError> {
        self.expect_state(FlowState::Initiated, "poll_for_token")?;
        self.state = FlowState::Polling;
        let settings = PollSettings::new(settings.interval, settings.max_attempts);

        for attempt in 1..=settings.max_attempts {
            tokio::time::sleep(settings.interval).await;

            let response = match self
                .client
                .post(&self.token_url)
                .json(&TokenRequest {
                    device_code: &pending.device_code,
                })
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    self.state = FlowState::Failed;
                    return Err(AuthError::Transport(err.to_string()));
                }
            };

            let status = response.status();
            if !status.is_success() {
                debug!(attempt, %status, "token not issued yet");
                continue;
            }

            match response.json::<TokenResponse>().await {
                Ok(TokenResponse {
                    token: Some(token),
                    expires_at,
                }) if !token.trim().is_empty() => {
                    let credential = Credential {
                        token,
                        device_id: self.device_id.clone(),
                        expires_at: expires_at.as_deref().and_then(parse_expiry),
                    };
                    if credential.is_expired(Utc::now()) {
                        debug!(attempt, "issued token already expired");
                        continue;
                    }
                    self.state = FlowState::Authorized;
                    info!(attempt, "device authorized");
                    return Ok(credential);
                }
                Ok(_) => debug!(attempt, "authorization pending"),
                Err(err) => debug!(attempt, error = %err, "unreadable token response"),
            }
        }

        self.state = FlowState::TimedOut;
        Err(AuthError::TimedOut {
            attempts: settings.max_attempts,
        })
    }

    async fn request_device_code(&self, host: &str) -> Result<PendingAuthorization, AuthError> {
        let response = self
            .client
            .post(&self.device_login_url)
            .json(&DeviceLoginRequest { host })
            .send()
            .await
            .map_err(|err| AuthError::Initiation(err.to_string()))?;
        if !response.status().is_success() {
            return Err(AuthError::Initiation(format!(
                "Device login request failed with status {}",
                response.status()
            )));
        }
        let payload: DeviceLoginResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Initiation(format!("Invalid device login response: {err}")))?;
        let device_code = payload
            .device_code
            .filter(|code| !code.trim().is_empty())
            .ok_or_else(|| {
                AuthError::Initiation("Device login response missing device code".to_string())
            })?;
        let verification_uri = payload
            .verification_uri
            .filter(|uri| !uri.trim().is_empty())
            .ok_or_else(|| {
                AuthError::Initiation("Device login response missing verification URI".to_string())
            })?;
        Ok(PendingAuthorization {
            device_code,
            verification_uri,
        })
    }

    fn expect_state(&self, expected: FlowState, operation: &str) -> Result<(), AuthError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(AuthError::InvalidState(format!(
                "{operation} requires state {expected}, flow is {}",
                self.state
            )))
        }
    }
}

#[derive(Debug, Serialize)]
struct DeviceLoginRequest<'a> {
    host: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceLoginResponse {
    device_code: Option<String>,
    verification_uri: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    device_code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    token: Option<String>,
    expires_at: Option<String>,
}

fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
