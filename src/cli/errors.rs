//! CLI-specific error formatting for user-facing messages.

use crate::error::MoveForwardError;

/// Map a [`MoveForwardError`] to a user-facing help string with actionable guidance.
pub fn format_error_help(err: &MoveForwardError) -> String {
    match err {
        e if e.needs_setup() => {
            format!("{e}. Please run 'move-forward setup <service-name>' first.")
        }
        e if e.needs_login() => format!("{e}. Please run 'move-forward login' first."),
        MoveForwardError::MissingForwardUrl => {
            format!("{err}. Run: move-forward listen --forward <url>")
        }
        MoveForwardError::AuthTimeout { .. } | MoveForwardError::AuthTransport(_) => {
            format!("{err}. Run 'move-forward login' to start over.")
        }
        MoveForwardError::ConfigIo(_) => {
            format!("{err}. Fix or remove the config file, or pass --config <path>.")
        }
        other => format!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_service_points_to_setup() {
        let help = format_error_help(&MoveForwardError::NoServiceConfigured);
        assert_eq!(
            help,
            "No service configured. Please run 'move-forward setup <service-name>' first."
        );
    }

    #[test]
    fn not_logged_in_points_to_login() {
        let help = format_error_help(&MoveForwardError::NotLoggedIn);
        assert!(help.contains("move-forward login"));
    }

    #[test]
    fn missing_forward_url_mentions_flag() {
        let help = format_error_help(&MoveForwardError::MissingForwardUrl);
        assert!(help.contains("--forward"));
    }

    #[test]
    fn other_errors_fall_through_to_display() {
        let err = MoveForwardError::Lookup("service acme not found (status 404 Not Found)".into());
        assert_eq!(
            format_error_help(&err),
            "Service lookup failed: service acme not found (status 404 Not Found)"
        );
    }
}
