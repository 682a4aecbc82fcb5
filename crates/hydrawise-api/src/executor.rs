// Request execution
//
// One call = one token lookup, one session, one document, one response.
// The session is a scoped value: it is dropped when `run` returns, whichever
// way it returns. No batching and no retries happen here.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::auth::TokenProvider;
use crate::error::Error;
use crate::graphql::{GraphQlRequest, Operation, OperationKind};
use crate::transport::SessionFactory;

/// Sends validated operations over fresh authenticated sessions.
#[derive(Clone)]
pub struct Executor {
    auth: Arc<dyn TokenProvider>,
    sessions: Arc<dyn SessionFactory>,
}

impl Executor {
    pub fn new(auth: Arc<dyn TokenProvider>, sessions: Arc<dyn SessionFactory>) -> Self {
        Self { auth, sessions }
    }

    /// Run a query and return its `data` tree.
    pub async fn run_query(&self, operation: &Operation) -> Result<Value, Error> {
        self.run(OperationKind::Query, operation).await
    }

    /// Run a mutation and return its `data` tree.
    pub async fn run_mutation(&self, operation: &Operation) -> Result<Value, Error> {
        self.run(OperationKind::Mutation, operation).await
    }

    async fn run(&self, expected: OperationKind, operation: &Operation) -> Result<Value, Error> {
        if operation.kind() != expected {
            return Err(Error::Schema(format!(
                "{} is a {}, not a {expected}",
                operation.name(),
                operation.kind()
            )));
        }

        let token = self.auth.token().await.map_err(|e| match e {
            Error::Authentication { .. } => e,
            other => Error::Authentication {
                message: other.to_string(),
            },
        })?;

        let request = GraphQlRequest::new(operation);
        debug!(operation = operation.name(), kind = %operation.kind(), "executing");
        trace!(document = %request.query);

        let session = self.sessions.open(&token).await?;
        let response = session.send(&request).await;
        drop(session);

        response?.into_data()
    }
}
