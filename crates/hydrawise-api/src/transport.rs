// Transport sessions for the GraphQL endpoint.
//
// Every operation opens its own session: a `reqwest::Client` carrying the
// caller's `Authorization` header, used for one POST and then dropped.
// Sessions come from a `SessionFactory`, so tests can swap in a fake.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::graphql::{GraphQlRequest, GraphQlResponse};

/// Production GraphQL endpoint.
pub const API_URL: &str = "https://app.hydrawise.com/api/v2/graph";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("hydrawise-api/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Additionally trust a CA certificate from the given PEM file.
    CustomCa(PathBuf),
}

/// Endpoint and HTTP settings shared by every session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Url,
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for `endpoint`, normally [`API_URL`].
    pub fn new(endpoint: &str) -> Result<Self, Error> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` with the given default headers.
    pub fn build_client(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers);

        if let TlsMode::CustomCa(path) = &self.tls {
            let cert_pem = std::fs::read(path)
                .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
            let cert = reqwest::Certificate::from_pem(&cert_pem)
                .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── Session traits ──────────────────────────────────────────────────

/// Opens one authenticated session per operation.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// `authorization` is the full header value, e.g. `Bearer <token>`.
    async fn open(&self, authorization: &SecretString) -> Result<Box<dyn Session>, Error>;
}

/// A single-use connection to the GraphQL endpoint.
///
/// Released when dropped, on success and error paths alike.
#[async_trait]
pub trait Session: Send + Sync {
    async fn send(&self, request: &GraphQlRequest) -> Result<GraphQlResponse, Error>;
}

// ── HTTP implementation ─────────────────────────────────────────────

/// Sessions over HTTPS with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSessionFactory {
    config: ClientConfig,
}

impl HttpSessionFactory {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn endpoint(&self) -> &Url {
        &self.config.endpoint
    }
}

#[async_trait]
impl SessionFactory for HttpSessionFactory {
    async fn open(&self, authorization: &SecretString) -> Result<Box<dyn Session>, Error> {
        let mut value = HeaderValue::from_str(authorization.expose_secret()).map_err(|e| {
            Error::Authentication {
                message: format!("invalid authorization header value: {e}"),
            }
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        let http = self.config.build_client(headers)?;
        Ok(Box::new(HttpSession {
            http,
            endpoint: self.config.endpoint.clone(),
        }))
    }
}

struct HttpSession {
    http: reqwest::Client,
    endpoint: Url,
}

#[async_trait]
impl Session for HttpSession {
    async fn send(&self, request: &GraphQlRequest) -> Result<GraphQlResponse, Error> {
        debug!("POST {}", self.endpoint);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        trace!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn production_endpoint_parses() {
        let config = ClientConfig::new(API_URL).unwrap();
        assert_eq!(config.endpoint.as_str(), API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), 200);
    }

    #[tokio::test]
    async fn header_with_newline_is_an_auth_error() {
        let factory = HttpSessionFactory::new(ClientConfig::new(API_URL).unwrap());
        let bad = SecretString::from("Bearer a\nb".to_owned());
        assert!(matches!(
            factory.open(&bad).await,
            Err(Error::Authentication { .. })
        ));
    }
}
