//! move-forward: a personal webhook relay.
//!
//! Logs in to a hosted webhook service with a device-code flow, opens the
//! service's event stream and forwards every event to a local HTTP endpoint.
//!
//! # Quick Start
//!
//! ```no_run
//! use move_forward::config::Settings;
//! use move_forward::context::AppContext;
//! use move_forward::relay::EventRelay;
//!
//! # async fn example() -> move_forward::error::Result<()> {
//! let ctx = AppContext::load(Settings::from_env())?;
//! let service = ctx.config().current_service()?;
//! let credential = ctx
//!     .config()
//!     .credential()
//!     .ok_or(move_forward::error::MoveForwardError::NotLoggedIn)?;
//! let target = ctx
//!     .config()
//!     .relay_target()
//!     .ok_or(move_forward::error::MoveForwardError::MissingForwardUrl)?;
//! let relay = EventRelay::new(ctx.http().clone(), ctx.settings().forward_timeout);
//! let err = relay
//!     .run(&service.web_socket_base_url, &credential, &target)
//!     .await
//!     .unwrap_err();
//! eprintln!("{err}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod relay;

#[cfg(feature = "cli")]
pub mod cli;
