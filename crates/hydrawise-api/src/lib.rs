// hydrawise-api: Async Rust client for the Hydrawise irrigation GraphQL API

pub mod auth;
pub mod client;
pub mod error;
pub mod executor;
pub mod graphql;
pub mod model;
pub mod schema;
pub mod selector;
pub mod transport;

pub use auth::{StaticToken, TokenProvider};
pub use client::Hydrawise;
pub use error::Error;
pub use executor::Executor;
pub use graphql::{ArgValue, GraphQlError, GraphQlRequest, GraphQlResponse, Operation, OperationKind, Selection};
pub use model::{
    Controller, ControllerHardware, DateTime, Decode, StatusCodeAndSummary, Timestamp, User, Zone,
    ZoneSuspension, deserialize,
};
pub use schema::Schema;
pub use selector::{relation, selectors_for};
pub use transport::{API_URL, ClientConfig, HttpSessionFactory, Session, SessionFactory, TlsMode};
