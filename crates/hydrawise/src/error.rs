//! CLI error types with miette diagnostics.
//!
//! Maps `hydrawise_api::Error` and `ConfigError` variants into user-facing
//! errors with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use hydrawise_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const MUTATION_REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Hydrawise API")]
    #[diagnostic(
        code(hydrawise::connection_failed),
        help(
            "Check your network connection and the endpoint URL.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(hydrawise::auth_failed),
        help(
            "Your access token may have expired.\n\
             Run: hydrawise config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(hydrawise::no_credentials),
        help(
            "Store one with: hydrawise config set-token --profile {profile}\n\
             Or set the HYDRAWISE_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(hydrawise::not_found),
        help("Run: hydrawise {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{operation} was rejected{}", summary_suffix(.summary.as_deref()))]
    #[diagnostic(code(hydrawise::mutation_rejected))]
    MutationRejected {
        operation: String,
        summary: Option<String>,
    },

    #[error("API error: {message}")]
    #[diagnostic(code(hydrawise::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hydrawise::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hydrawise::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(hydrawise::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn summary_suffix(summary: Option<&str>) -> String {
    match summary {
        Some(s) if !s.is_empty() => format!(": {s}"),
        _ => String::new(),
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::MutationRejected { .. } => exit_code::MUTATION_REJECTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library errors → CliError ────────────────────────────────────────

impl From<hydrawise_api::Error> for CliError {
    fn from(err: hydrawise_api::Error) -> Self {
        use hydrawise_api::Error as ApiErr;

        match err {
            ApiErr::Authentication { message } => Self::AuthFailed { message },
            ApiErr::Http { status: 401, .. } => Self::AuthFailed {
                message: "the server rejected the access token".into(),
            },
            ApiErr::Mutation { operation, summary } => Self::MutationRejected { operation, summary },
            ApiErr::Transport(_) | ApiErr::Http { .. } | ApiErr::Tls(_) | ApiErr::InvalidUrl(_) => {
                Self::ConnectionFailed {
                    reason: err.to_string(),
                }
            }
            other => Self::ApiError {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_exit_codes() {
        let cases = [
            (
                hydrawise_api::Error::Authentication {
                    message: "expired".into(),
                },
                exit_code::AUTH,
            ),
            (
                hydrawise_api::Error::Http {
                    status: 401,
                    body: String::new(),
                },
                exit_code::AUTH,
            ),
            (
                hydrawise_api::Error::Http {
                    status: 503,
                    body: String::new(),
                },
                exit_code::CONNECTION,
            ),
            (
                hydrawise_api::Error::Mutation {
                    operation: "startZone".into(),
                    summary: Some("zone busy".into()),
                },
                exit_code::MUTATION_REJECTED,
            ),
            (
                hydrawise_api::Error::Protocol {
                    message: "odd".into(),
                },
                exit_code::GENERAL,
            ),
        ];

        for (err, code) in cases {
            let cli = CliError::from(err);
            assert_eq!(cli.exit_code(), code, "{cli:?}");
        }
    }

    #[test]
    fn rejected_mutation_shows_summary() {
        let cli = CliError::MutationRejected {
            operation: "stopZone".into(),
            summary: Some("controller offline".into()),
        };
        assert_eq!(cli.to_string(), "stopZone was rejected: controller offline");

        let bare = CliError::MutationRejected {
            operation: "deleteZoneSuspension".into(),
            summary: None,
        };
        assert_eq!(bare.to_string(), "deleteZoneSuspension was rejected");
    }
}
