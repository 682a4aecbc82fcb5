use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Source of the `Authorization` header value for each call.
///
/// Called once per operation, before any network I/O. How the token is
/// obtained or refreshed is up to the implementation; a failure must come
/// back as [`Error::Authentication`].
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<SecretString, Error>;
}

/// A pre-issued OAuth access token, sent as `Bearer <token>`.
#[derive(Debug, Clone)]
pub struct StaticToken {
    access_token: SecretString,
}

impl StaticToken {
    pub fn new(access_token: impl Into<SecretString>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<SecretString, Error> {
        let token = self.access_token.expose_secret();
        if token.is_empty() {
            return Err(Error::Authentication {
                message: "access token is empty".into(),
            });
        }
        Ok(SecretString::from(format!("Bearer {token}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_is_bearer() {
        let auth = StaticToken::new("abc123".to_owned());
        let header = auth.token().await.unwrap();
        assert_eq!(header.expose_secret(), "Bearer abc123");
    }

    #[tokio::test]
    async fn empty_token_fails() {
        let auth = StaticToken::new(String::new());
        assert!(matches!(
            auth.token().await,
            Err(Error::Authentication { .. })
        ));
    }
}
