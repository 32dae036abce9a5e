use std::convert::Infallible;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::forward::Forwarder;
use super::source::{EventSource, Inbound};
use crate::error::{MoveForwardError, Result};

/// Callback invoked for every relay lifecycle event.
pub type RelayObserver = Arc<dyn Fn(&RelayEvent) + Send + Sync>;

/// Progress reported by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Connected { forward_url: String },
    Received { seq: u64, body: Vec<u8> },
    Forwarded { seq: u64 },
    ForwardFailed { seq: u64, error: String },
    Closed { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Connected,
    Closed,
}

/// Outcome of one receive-and-forward iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStep {
    Forwarded { seq: u64 },
    ForwardFailed { seq: u64 },
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub received: u64,
    pub forwarded: u64,
    pub failed: u64,
}

/// Receive-then-forward state machine over one event source.
///
/// Every `step` performs exactly one receive and at most one forward, so
/// events reach the forwarder in receipt order and one at a time.
pub struct RelayLoop<S, F> {
    source: S,
    forwarder: F,
    state: RelayState,
    stats: RelayStats,
    observer: Option<RelayObserver>,
}

impl<S: EventSource, F: Forwarder> RelayLoop<S, F> {
    pub fn new(source: S, forwarder: F) -> Self {
        Self {
            source,
            forwarder,
            state: RelayState::Connected,
            stats: RelayStats::default(),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Option<RelayObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Wait for the next inbound item and forward it if it is an event.
    ///
    /// A failed forward is counted and reported but is not an error here. A
    /// receive error closes the loop and is returned.
    pub async fn step(&mut self) -> Result<RelayStep> {
        if self.state == RelayState::Closed {
            return Err(MoveForwardError::InvalidState(
                "relay loop is closed".to_string(),
            ));
        }

        let body = match self.source.recv().await {
            Ok(Inbound::Event(body)) => body,
            Ok(Inbound::Control) => {
                debug!("skipping control frame");
                return Ok(RelayStep::Skipped);
            }
            Err(err) => {
                self.state = RelayState::Closed;
                info!(
                    forwarded = self.stats.forwarded,
                    failed = self.stats.failed,
                    error = %err,
                    "relay closed"
                );
                self.emit(&RelayEvent::Closed {
                    error: err.to_string(),
                });
                return Err(err);
            }
        };

        self.stats.received += 1;
        let seq = self.stats.received;
        debug!(seq, bytes = body.len(), "received webhook");
        self.emit(&RelayEvent::Received {
            seq,
            body: body.clone(),
        });

        match self.forwarder.forward(&body).await {
            Ok(()) => {
                self.stats.forwarded += 1;
                self.emit(&RelayEvent::Forwarded { seq });
                Ok(RelayStep::Forwarded { seq })
            }
            Err(err) => {
                self.stats.failed += 1;
                warn!(seq, error = %err, "dropping webhook after failed forward");
                self.emit(&RelayEvent::ForwardFailed {
                    seq,
                    error: err.to_string(),
                });
                Ok(RelayStep::ForwardFailed { seq })
            }
        }
    }

    /// Step until the source fails; only ever returns the terminal error.
    pub async fn run(&mut self) -> Result<Infallible> {
        loop {
            self.step().await?;
        }
    }

    fn emit(&self, event: &RelayEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}
