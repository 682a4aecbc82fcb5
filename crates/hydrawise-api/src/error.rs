use thiserror::Error;

use crate::graphql::GraphQlError;

/// Top-level error type for the `hydrawise-api` crate.
///
/// Covers every failure mode of a single client call: credential lookup,
/// transport, GraphQL error envelopes, response decoding, and mutations the
/// server rejected. Nothing is retried or recovered internally; every variant
/// reaches the caller unchanged.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The token provider could not produce a credential.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response carried a GraphQL `errors` array.
    #[error("GraphQL error: {}", join_messages(.errors))]
    GraphQl { errors: Vec<GraphQlError> },

    /// The response body was not a GraphQL envelope.
    #[error("Invalid GraphQL response: {message}")]
    InvalidResponse { message: String, body: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The wire value did not match the entity it was decoded into.
    #[error("Failed to decode {type_name}: {message}")]
    Deserialization {
        type_name: &'static str,
        message: String,
    },

    // ── Mutations ───────────────────────────────────────────────────
    /// The server reported a non-OK status, or a boolean mutation returned `false`.
    #[error("Mutation {operation} failed{}", summary_suffix(.summary.as_deref()))]
    Mutation {
        operation: String,
        summary: Option<String>,
    },

    /// The mutation result had a shape the client does not understand.
    #[error("Protocol violation: {message}")]
    Protocol { message: String },

    // ── Schema ──────────────────────────────────────────────────────
    /// Malformed schema declaration or a selection the schema does not allow.
    #[error("Schema error: {0}")]
    Schema(String),
}

fn join_messages(errors: &[GraphQlError]) -> String {
    if errors.is_empty() {
        return "(no message)".into();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn summary_suffix(summary: Option<&str>) -> String {
    match summary {
        Some(s) if !s.is_empty() => format!(": {s}"),
        _ => String::new(),
    }
}

impl Error {
    pub(crate) fn decode(type_name: &'static str, message: impl Into<String>) -> Self {
        Self::Deserialization {
            type_name,
            message: message.into(),
        }
    }

    /// Returns `true` for network-level failures and GraphQL error responses.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Http { .. }
                | Self::GraphQl { .. }
                | Self::InvalidResponse { .. }
                | Self::InvalidUrl(_)
                | Self::Tls(_)
        )
    }

    /// Returns `true` if the credential could not be obtained or was rejected.
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Http { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// The server-provided summary of a rejected mutation, if any.
    pub fn mutation_summary(&self) -> Option<&str> {
        match self {
            Self::Mutation { summary, .. } => summary.as_deref(),
            _ => None,
        }
    }
}
