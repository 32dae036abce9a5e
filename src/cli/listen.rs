//! CLI handler for the webhook listener.

use std::sync::Arc;

use chrono::Utc;

use crate::context::AppContext;
use crate::error::{MoveForwardError, Result};
use crate::relay::{EventRelay, RelayEvent};

/// Handle `move-forward listen [-f URL]`.
///
/// Runs until the event stream fails; that failure is the returned error.
pub async fn handle_listen(ctx: &mut AppContext, forward: Option<&str>) -> Result<()> {
    let service = ctx.config().current_service()?.clone();
    let credential = ctx
        .config()
        .credential()
        .ok_or(MoveForwardError::NotLoggedIn)?;
    if credential.is_expired(Utc::now()) {
        return Err(MoveForwardError::CredentialExpired);
    }

    let (target, changed) = ctx.config_mut().resolve_relay_target(forward)?;
    if changed {
        ctx.save()?;
    }

    println!("🌐 Starting webhook listener...");

    let relay = EventRelay::new(ctx.http().clone(), ctx.settings().forward_timeout)
        .with_observer(Arc::new(print_relay_event));
    match relay
        .run(&service.web_socket_base_url, &credential, &target)
        .await
    {
        Ok(never) => match never {},
        Err(e) => Err(e),
    }
}

fn print_relay_event(event: &RelayEvent) {
    match event {
        RelayEvent::Connected { forward_url } => {
            println!("✅ Webhook listener started");
            println!("🔄 Forwarding events to: {forward_url}");
        }
        RelayEvent::Received { body, .. } => {
            println!("\n🌟 Received Webhook:");
            println!("{}", String::from_utf8_lossy(body));
        }
        RelayEvent::ForwardFailed { error, .. } => {
            eprintln!("❌ Failed to forward webhook: {error}");
        }
        RelayEvent::Forwarded { .. } | RelayEvent::Closed { .. } => {}
    }
}
