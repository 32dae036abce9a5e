//! CLI entry point for move-forward.

pub mod auth;
pub mod errors;
pub mod listen;
pub mod service;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::context::AppContext;
use crate::directory::ServiceDirectory;
use crate::error::Result;

/// Relay webhooks from a hosted service to your local server
#[derive(Parser, Debug)]
#[command(name = "move-forward", version, about = "Relay webhooks to your local server")]
pub struct Cli {
    /// Path to the config file (defaults to ~/.move-forward.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available webhook services
    List,
    /// Configure the CLI for a specific webhook service
    Setup(SetupArgs),
    /// Log in to the configured webhook service
    Login,
    /// Listen for webhooks and forward them to your local server
    Listen(ListenArgs),
    /// Show the configured service and login state
    Status,
    /// Forget the saved login token
    Logout,
}

/// Arguments for `move-forward setup`.
#[derive(Parser, Debug)]
pub struct SetupArgs {
    /// Service name as listed by `move-forward list`
    pub service: String,
}

/// Arguments for `move-forward listen`.
#[derive(Parser, Debug)]
pub struct ListenArgs {
    /// Local server URL to forward webhooks to (saved for next time)
    #[arg(short, long)]
    pub forward: Option<String>,
}

impl Cli {
    /// Settings from the environment with CLI overrides applied.
    pub fn settings(&self) -> Settings {
        let settings = Settings::from_env();
        match &self.config {
            Some(path) => settings.with_config_path(path.clone()),
            None => settings,
        }
    }
}

/// Dispatch one command.
///
/// `list` only talks to the directory; every other command loads the config
/// file first.
pub async fn run(command: Commands, settings: Settings) -> Result<()> {
    match command {
        Commands::List => {
            let directory = ServiceDirectory::new(settings.http_client()?, settings.directory_url);
            service::handle_list(&directory).await
        }
        Commands::Setup(args) => {
            let mut ctx = AppContext::load(settings)?;
            service::handle_setup(&mut ctx, &args.service).await
        }
        Commands::Login => auth::handle_login(&mut AppContext::load(settings)?).await,
        Commands::Listen(args) => {
            let mut ctx = AppContext::load(settings)?;
            listen::handle_listen(&mut ctx, args.forward.as_deref()).await
        }
        Commands::Status => auth::handle_status(&AppContext::load(settings)?),
        Commands::Logout => auth::handle_logout(&mut AppContext::load(settings)?),
    }
}
