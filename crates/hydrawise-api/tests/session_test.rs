// Session lifecycle tests with in-memory collaborators.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use hydrawise_api::{
    Error, GraphQlRequest, GraphQlResponse, Hydrawise, Schema, Session, SessionFactory,
    TokenProvider,
};

// ── Fakes ───────────────────────────────────────────────────────────

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    released: AtomicUsize,
    sent: AtomicUsize,
}

struct FakeFactory {
    counters: Arc<Counters>,
    reply: fn() -> Result<GraphQlResponse, Error>,
    expected_header: &'static str,
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn open(&self, authorization: &SecretString) -> Result<Box<dyn Session>, Error> {
        assert_eq!(authorization.expose_secret(), self.expected_header);
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            counters: Arc::clone(&self.counters),
            reply: self.reply,
        }))
    }
}

struct FakeSession {
    counters: Arc<Counters>,
    reply: fn() -> Result<GraphQlResponse, Error>,
}

#[async_trait]
impl Session for FakeSession {
    async fn send(&self, _request: &GraphQlRequest) -> Result<GraphQlResponse, Error> {
        self.counters.sent.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct Token(Option<&'static str>);

#[async_trait]
impl TokenProvider for Token {
    async fn token(&self) -> Result<SecretString, Error> {
        match self.0 {
            Some(t) => Ok(SecretString::from(format!("Bearer {t}"))),
            None => Err(Error::Protocol {
                message: "token service unavailable".into(),
            }),
        }
    }
}

fn client(
    token: Option<&'static str>,
    reply: fn() -> Result<GraphQlResponse, Error>,
) -> (Hydrawise, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let factory = FakeFactory {
        counters: Arc::clone(&counters),
        reply,
        expected_header: "Bearer secret",
    };
    let client = Hydrawise::new(
        Schema::shared().unwrap(),
        Arc::new(Token(token)),
        Arc::new(factory),
    );
    (client, counters)
}

fn user_reply() -> Result<GraphQlResponse, Error> {
    Ok(GraphQlResponse {
        data: Some(json!({
            "me": { "id": 1, "customerId": 2, "name": "Jo", "email": "jo@example.com" }
        })),
        errors: None,
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn one_session_per_call_and_released() {
    let (client, counters) = client(Some("secret"), user_reply);

    client.get_user().await.unwrap();
    client.get_user().await.unwrap();

    assert_eq!(counters.opened.load(Ordering::SeqCst), 2);
    assert_eq!(counters.sent.load(Ordering::SeqCst), 2);
    assert_eq!(counters.released.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn token_failure_opens_no_session() {
    let (client, counters) = client(None, user_reply);

    let err = client.get_user().await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }), "got: {err:?}");
    assert!(err.to_string().contains("token service unavailable"));
    assert_eq!(counters.opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn session_released_when_send_fails() {
    let (client, counters) = client(Some("secret"), || {
        Err(Error::Http {
            status: 502,
            body: "bad gateway".into(),
        })
    });

    let err = client.get_user().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn session_released_when_decoding_fails() {
    let (client, counters) = client(Some("secret"), || {
        Ok(GraphQlResponse {
            data: Some(json!({ "me": { "id": "not a number" } })),
            errors: None,
        })
    });

    let err = client.get_user().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let (client, counters) = client(Some("secret"), user_reply);

    let (a, b, c) = tokio::join!(client.get_user(), client.get_user(), client.get_user());
    assert_eq!(a.unwrap(), b.unwrap());
    c.unwrap();

    assert_eq!(counters.opened.load(Ordering::SeqCst), 3);
    assert_eq!(counters.released.load(Ordering::SeqCst), 3);
}
