// Public client for the Hydrawise GraphQL API
//
// Each method builds one schema-checked operation, runs it through the
// executor, and turns the `data` tree into domain entities or a success /
// failure verdict. Entities are never cached: call again to observe changes.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::auth::TokenProvider;
use crate::error::Error;
use crate::executor::Executor;
use crate::graphql::{ArgValue, Operation};
use crate::model::{
    Controller, DateTime, Decode, StatusCodeAndSummary, Timestamp, User, Zone, ZoneSuspension,
    deserialize,
};
use crate::schema::Schema;
use crate::selector::{relation, selectors_for};
use crate::transport::{ClientConfig, HttpSessionFactory, SessionFactory};

type Args = Vec<(&'static str, ArgValue)>;

/// Async client for the Hydrawise cloud API.
///
/// Cheap to clone; clones share the schema and collaborators. Calls are
/// independent and may run concurrently; the client imposes no ordering.
#[derive(Clone)]
pub struct Hydrawise {
    schema: Arc<Schema>,
    executor: Executor,
}

impl Hydrawise {
    // ── Constructors ─────────────────────────────────────────────────

    /// Assemble a client from explicit collaborators.
    pub fn new(
        schema: Arc<Schema>,
        auth: Arc<dyn TokenProvider>,
        sessions: Arc<dyn SessionFactory>,
    ) -> Self {
        Self {
            schema,
            executor: Executor::new(auth, sessions),
        }
    }

    /// HTTPS client against `config.endpoint`, using the shared schema.
    pub fn connect(config: ClientConfig, auth: impl TokenProvider + 'static) -> Result<Self, Error> {
        debug!(endpoint = %config.endpoint, "creating client");
        Ok(Self::new(
            Schema::shared()?,
            Arc::new(auth),
            Arc::new(HttpSessionFactory::new(config)),
        ))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub async fn get_user(&self) -> Result<User, Error> {
        let op = self.schema.query(
            "me",
            Vec::new(),
            selectors_for(&self.schema, User::TYPE_NAME)?,
        )?;
        let data = self.executor.run_query(&op).await?;
        decode_at(&data, &["me"])
    }

    pub async fn get_controllers(&self) -> Result<Vec<Controller>, Error> {
        let op = self.schema.query(
            "me",
            Vec::new(),
            vec![relation(&self.schema, User::TYPE_NAME, "controllers")?],
        )?;
        let data = self.executor.run_query(&op).await?;
        decode_at(&data, &["me", "controllers"])
    }

    pub async fn get_controller(&self, controller_id: i64) -> Result<Controller, Error> {
        let op = self.schema.query(
            "controller",
            vec![("controllerId", ArgValue::Int(controller_id))],
            selectors_for(&self.schema, Controller::TYPE_NAME)?,
        )?;
        let data = self.executor.run_query(&op).await?;
        decode_at(&data, &["controller"])
    }

    pub async fn get_zones(&self, controller: &Controller) -> Result<Vec<Zone>, Error> {
        let op = self.schema.query(
            "controller",
            vec![("controllerId", ArgValue::Int(controller.id))],
            vec![relation(&self.schema, Controller::TYPE_NAME, "zones")?],
        )?;
        let mut data = self.executor.run_query(&op).await?;
        if let Some(zones) = data
            .pointer_mut("/controller/zones")
            .and_then(Value::as_array_mut)
        {
            for zone in zones {
                attach_parent::<Zone>(zone, "controllerId", controller.id)?;
            }
        }
        decode_at(&data, &["controller", "zones"])
    }

    pub async fn get_zone(&self, zone_id: i64) -> Result<Zone, Error> {
        let op = self.schema.query(
            "zone",
            vec![("zoneId", ArgValue::Int(zone_id))],
            selectors_for(&self.schema, Zone::TYPE_NAME)?,
        )?;
        let data = self.executor.run_query(&op).await?;
        decode_at(&data, &["zone"])
    }

    // ── Zone mutations ───────────────────────────────────────────────

    /// Start a zone run.
    ///
    /// `custom_run_duration` is in seconds; zero or less means "use the
    /// zone's configured default" and is not sent at all.
    pub async fn start_zone(
        &self,
        zone: &Zone,
        mark_run_as_scheduled: bool,
        custom_run_duration: i64,
    ) -> Result<(), Error> {
        let args = run_args(
            ("zoneId", zone.id),
            mark_run_as_scheduled,
            custom_run_duration,
        );
        self.mutate("startZone", args).await
    }

    pub async fn stop_zone(&self, zone: &Zone) -> Result<(), Error> {
        self.mutate("stopZone", vec![("zoneId", ArgValue::Int(zone.id))])
            .await
    }

    pub async fn suspend_zone(&self, zone: &Zone, until: &Timestamp) -> Result<(), Error> {
        self.mutate(
            "suspendZone",
            vec![
                ("zoneId", ArgValue::Int(zone.id)),
                ("until", ArgValue::String(DateTime::argument(until))),
            ],
        )
        .await
    }

    pub async fn resume_zone(&self, zone: &Zone) -> Result<(), Error> {
        self.mutate("resumeZone", vec![("zoneId", ArgValue::Int(zone.id))])
            .await
    }

    pub async fn delete_zone_suspension(&self, suspension: &ZoneSuspension) -> Result<(), Error> {
        let op = self.schema.mutation(
            "deleteZoneSuspension",
            vec![("id", ArgValue::Int(suspension.id))],
            Vec::new(),
        )?;
        self.run_mutation(&op).await
    }

    // ── Controller-wide mutations ────────────────────────────────────

    /// Start every zone on `controller`. Duration semantics match [`Self::start_zone`].
    pub async fn start_all_zones(
        &self,
        controller: &Controller,
        mark_run_as_scheduled: bool,
        custom_run_duration: i64,
    ) -> Result<(), Error> {
        let args = run_args(
            ("controllerId", controller.id),
            mark_run_as_scheduled,
            custom_run_duration,
        );
        self.mutate("startAllZones", args).await
    }

    pub async fn stop_all_zones(&self, controller: &Controller) -> Result<(), Error> {
        self.mutate(
            "stopAllZones",
            vec![("controllerId", ArgValue::Int(controller.id))],
        )
        .await
    }

    pub async fn suspend_all_zones(
        &self,
        controller: &Controller,
        until: &Timestamp,
    ) -> Result<(), Error> {
        self.mutate(
            "suspendAllZones",
            vec![
                ("controllerId", ArgValue::Int(controller.id)),
                ("until", ArgValue::String(DateTime::argument(until))),
            ],
        )
        .await
    }

    pub async fn resume_all_zones(&self, controller: &Controller) -> Result<(), Error> {
        self.mutate(
            "resumeAllZones",
            vec![("controllerId", ArgValue::Int(controller.id))],
        )
        .await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Run a mutation that selects the status/summary result.
    async fn mutate(&self, name: &str, args: Args) -> Result<(), Error> {
        let op = self.schema.mutation(
            name,
            args,
            selectors_for(&self.schema, StatusCodeAndSummary::TYPE_NAME)?,
        )?;
        self.run_mutation(&op).await
    }

    async fn run_mutation(&self, op: &Operation) -> Result<(), Error> {
        let data = self.executor.run_mutation(op).await?;
        interpret_mutation(op.name(), &data)
    }
}

/// Arguments shared by `startZone` and `startAllZones`.
fn run_args(
    target: (&'static str, i64),
    mark_run_as_scheduled: bool,
    custom_run_duration: i64,
) -> Args {
    let mut args = vec![
        (target.0, ArgValue::Int(target.1)),
        ("markRunAsScheduled", ArgValue::Boolean(mark_run_as_scheduled)),
    ];
    if custom_run_duration > 0 {
        args.push(("customRunDuration", ArgValue::Int(custom_run_duration)));
    }
    args
}

/// Point a child fetched through its parent at that parent.
///
/// A missing or `null` reference is filled in; one naming another parent is
/// rejected.
fn attach_parent<T: Decode>(child: &mut Value, key: &str, parent_id: i64) -> Result<(), Error> {
    let Some(object) = child.as_object_mut() else {
        return Ok(());
    };
    match object.get(key) {
        None | Some(Value::Null) => {
            object.insert(key.to_owned(), Value::from(parent_id));
            Ok(())
        }
        Some(v) if v.as_i64() == Some(parent_id) => Ok(()),
        Some(other) => Err(Error::decode(
            T::TYPE_NAME,
            format!("`{key}` is {other}, expected {parent_id}"),
        )),
    }
}

/// Walk `path` through the `data` tree and decode what is there.
fn decode_at<T: Decode>(data: &Value, path: &[&str]) -> Result<T, Error> {
    let mut value = data;
    for key in path {
        value = value.get(key).ok_or_else(|| Error::Deserialization {
            type_name: T::TYPE_NAME,
            message: format!("response has no `{}`", path.join(".")),
        })?;
    }
    deserialize(value)
}

/// Decide whether a mutation succeeded from its top-level result.
pub(crate) fn interpret_mutation(name: &str, data: &Value) -> Result<(), Error> {
    match data.get(name) {
        Some(value @ Value::Object(_)) => {
            let result: StatusCodeAndSummary = deserialize(value)?;
            if result.is_ok() {
                Ok(())
            } else {
                debug!(operation = name, status = %result.status, "mutation rejected");
                Err(Error::Mutation {
                    operation: name.to_owned(),
                    summary: result.summary,
                })
            }
        }
        Some(Value::Bool(true)) => Ok(()),
        Some(Value::Bool(false)) => Err(Error::Mutation {
            operation: name.to_owned(),
            summary: None,
        }),
        Some(other) => Err(Error::Protocol {
            message: format!("unexpected result for {name}: {other}"),
        }),
        None => Err(Error::Protocol {
            message: format!("response has no result for {name}"),
        }),
    }
}
