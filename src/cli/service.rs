//! CLI handlers for service discovery and setup.

use crate::context::AppContext;
use crate::directory::ServiceDirectory;
use crate::error::Result;

/// Handle `move-forward list`.
pub async fn handle_list(directory: &ServiceDirectory) -> Result<()> {
    let services = directory.list_services().await?;

    println!("🔍 Available webhook services:");
    for service in &services {
        println!("- {service}");
    }
    println!("\nRun 'move-forward setup <service-name>' to configure");
    Ok(())
}

/// Handle `move-forward setup <service>`.
pub async fn handle_setup(ctx: &mut AppContext, name: &str) -> Result<()> {
    println!("⚙️  Setting up for {name} service...");

    let service = ctx.directory().fetch_service(name).await?;
    let summary = format!("{}: {}", service.name, service.description);
    ctx.config_mut().select_service(name.trim(), service);
    ctx.save()?;

    println!("✅ Setup complete for {summary}");
    println!("🔑 Run 'move-forward login' to authenticate");
    Ok(())
}
