//! Listen on the service's event stream and forward every event locally.

pub mod event_loop;
pub mod forward;
pub mod source;

pub use event_loop::{RelayEvent, RelayLoop, RelayObserver, RelayState, RelayStats, RelayStep};
pub use forward::{Forwarder, HttpForwarder, RelayTarget};
pub use source::{stream_url_with_token, EventSource, Inbound, WebSocketSource};

use std::convert::Infallible;
use std::time::Duration;

use tracing::info;

use crate::auth::Credential;
use crate::error::Result;

/// Wires a WebSocket source to an HTTP forwarder and runs the loop.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use move_forward::auth::Credential;
/// use move_forward::relay::{EventRelay, RelayTarget};
///
/// # async fn example() -> move_forward::error::Result<()> {
/// let credential = Credential {
///     token: "token".to_string(),
///     device_id: "device".to_string(),
///     expires_at: None,
/// };
/// let relay = EventRelay::new(reqwest::Client::new(), Duration::from_secs(30));
/// let target = RelayTarget::new("http://localhost:3000/webhooks");
/// let err = relay
///     .run("wss://events.example.com", &credential, &target)
///     .await
///     .unwrap_err();
/// eprintln!("{err}");
/// # Ok(())
/// # }
/// ```
pub struct EventRelay {
    client: reqwest::Client,
    forward_timeout: Duration,
    observer: Option<RelayObserver>,
}

impl EventRelay {
    pub fn new(client: reqwest::Client, forward_timeout: Duration) -> Self {
        Self {
            client,
            forward_timeout,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: RelayObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Connect once and relay until the stream fails.
    ///
    /// Connection failures return immediately; otherwise the loop runs until a
    /// read error, which is returned. Failed forwards are skipped.
    pub async fn run(
        &self,
        stream_url: &str,
        credential: &Credential,
        target: &RelayTarget,
    ) -> Result<Infallible> {
        let source = WebSocketSource::connect(stream_url, &credential.token).await?;
        info!(forward_url = %target.forward_url, "webhook listener started");
        if let Some(observer) = &self.observer {
            observer(&RelayEvent::Connected {
                forward_url: target.forward_url.clone(),
            });
        }

        let forwarder = HttpForwarder::new(self.client.clone(), target.clone(), self.forward_timeout);
        let mut relay = RelayLoop::new(source, forwarder).with_observer(self.observer.clone());
        relay.run().await
    }
}
