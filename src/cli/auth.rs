//! CLI auth command handlers for login, status, and logout.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::DeviceAuthFlow;
use crate::context::AppContext;
use crate::error::Result;

/// Handle `move-forward login`.
///
/// The credential is saved only after the service confirms the login.
pub async fn handle_login(ctx: &mut AppContext) -> Result<()> {
    let host = gethostname::gethostname().to_string_lossy().into_owned();
    handle_login_as(ctx, &host).await
}

/// Same as [`handle_login`] with an explicit host identifier.
pub async fn handle_login_as(ctx: &mut AppContext, host: &str) -> Result<()> {
    let service = ctx.config().current_service()?.clone();
    let device_id = ctx
        .config()
        .device_id()
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut flow = DeviceAuthFlow::new(ctx.http().clone(), &service.api_base_url, device_id);
    let pending = flow.initiate_login(host).await?;

    println!("🔗 Open the following link in your browser to authenticate:");
    println!("👉 {}", pending.verification_uri);
    println!("⌛ Waiting for authorization...");

    let credential = flow.poll_for_token(pending, service.poll_settings()).await?;
    ctx.config_mut().set_credential(credential);
    ctx.save()?;

    println!("✅ Logged in successfully.");
    Ok(())
}

/// Handle `move-forward status`.
pub fn handle_status(ctx: &AppContext) -> Result<()> {
    let config = ctx.config();

    println!("📡 move-forward status\n");

    match config.current_service() {
        Ok(service) => println!("  Service: {} ({})", service.name, service.api_base_url),
        Err(e) => println!("  Service: ❌ {e}"),
    }

    let login = match config.credential() {
        Some(credential) => match credential.expires_at {
            Some(expires) if credential.is_expired(Utc::now()) => {
                format!("⚠️  Token expired {}", expires.format("%Y-%m-%d %H:%M"))
            }
            Some(expires) => format!("✅ Logged in (expires {})", expires.format("%Y-%m-%d %H:%M")),
            None => "✅ Logged in".to_string(),
        },
        None => "❌ Not logged in".to_string(),
    };
    println!("  Login: {login}");

    match config.relay_target() {
        Some(target) => println!("  Forward URL: {}", target.forward_url),
        None => println!("  Forward URL: (not set)"),
    }
    println!("  Config: {}", ctx.settings().config_path.display());
    Ok(())
}

/// Handle `move-forward logout`.
pub fn handle_logout(ctx: &mut AppContext) -> Result<()> {
    if ctx.config().credential().is_none() {
        println!("ℹ️  Not logged in");
        return Ok(());
    }
    ctx.config_mut().clear_credential();
    ctx.save()?;
    println!("✅ Logged out");
    Ok(())
}
