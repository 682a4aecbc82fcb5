// ── Hydrawise domain entities ──
//
// Each entity declares the wire fields it is built from and decodes itself
// from a `serde_json::Value` tree with one explicit decoder per type. Nested
// entities and lists compose through the same trait. Unknown wire fields are
// ignored; missing required fields fail with the type and field named.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::Error;
use crate::schema::{FieldDef, ScalarType};

/// A domain timestamp, always in UTC.
pub type Timestamp = chrono::DateTime<Utc>;

// ── Decoding ────────────────────────────────────────────────────────

/// A type that can be built from a GraphQL response value.
pub trait Decode: Sized {
    /// The GraphQL type name.
    const TYPE_NAME: &'static str;

    /// The declared field set, in selection order.
    const FIELDS: &'static [FieldDef];

    fn decode(value: &Value) -> Result<Self, Error>;
}

/// Lists decode elementwise, in order, and fail as a whole if any item fails.
impl<T: Decode> Decode for Vec<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;
    const FIELDS: &'static [FieldDef] = T::FIELDS;

    fn decode(value: &Value) -> Result<Self, Error> {
        let items = value.as_array().ok_or_else(|| {
            Error::decode(
                T::TYPE_NAME,
                format!("expected a list, got {}", kind_of(value)),
            )
        })?;
        items.iter().map(T::decode).collect()
    }
}

/// Decode a wire value into `T`.
pub fn deserialize<T: Decode>(value: &Value) -> Result<T, Error> {
    T::decode(value)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Field accessor over a wire object, reporting errors against one type.
struct Fields<'a> {
    type_name: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn of<T: Decode>(value: &'a Value) -> Result<Self, Error> {
        let map = value.as_object().ok_or_else(|| {
            Error::decode(
                T::TYPE_NAME,
                format!("expected an object, got {}", kind_of(value)),
            )
        })?;
        Ok(Self {
            type_name: T::TYPE_NAME,
            map,
        })
    }

    fn required(&self, name: &str) -> Result<&'a Value, Error> {
        self.map
            .get(name)
            .ok_or_else(|| Error::decode(self.type_name, format!("missing field `{name}`")))
    }

    fn optional(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    fn invalid(&self, name: &str, expected: &str, got: &Value) -> Error {
        Error::decode(
            self.type_name,
            format!("field `{name}`: expected {expected}, got {}", kind_of(got)),
        )
    }

    fn int(&self, name: &str) -> Result<i64, Error> {
        let v = self.required(name)?;
        v.as_i64().ok_or_else(|| self.invalid(name, "an integer", v))
    }

    fn opt_int(&self, name: &str) -> Result<Option<i64>, Error> {
        self.optional(name)
            .map(|v| v.as_i64().ok_or_else(|| self.invalid(name, "an integer", v)))
            .transpose()
    }

    fn string(&self, name: &str) -> Result<String, Error> {
        let v = self.required(name)?;
        v.as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.invalid(name, "a string", v))
    }

    fn opt_string(&self, name: &str) -> Result<Option<String>, Error> {
        self.optional(name)
            .map(|v| {
                v.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| self.invalid(name, "a string", v))
            })
            .transpose()
    }

    fn boolean(&self, name: &str) -> Result<bool, Error> {
        let v = self.required(name)?;
        v.as_bool().ok_or_else(|| self.invalid(name, "a boolean", v))
    }

    fn object<T: Decode>(&self, name: &str) -> Result<T, Error> {
        T::decode(self.required(name)?)
    }

    fn opt_object<T: Decode>(&self, name: &str) -> Result<Option<T>, Error> {
        self.optional(name).map(T::decode).transpose()
    }

    /// A `null` list is treated as empty; an absent one is an error.
    fn list<T: Decode>(&self, name: &str) -> Result<Vec<T>, Error> {
        let v = self.required(name)?;
        if v.is_null() {
            return Ok(Vec::new());
        }
        Vec::<T>::decode(v)
    }
}

// ── DateTime ────────────────────────────────────────────────────────

/// Wire form of a timestamp: `{ "value": <text>, "timestamp": <epoch seconds> }`.
///
/// The client writes `value` as RFC 3339 in UTC, with fractional seconds when
/// present, so the wire form round-trips exactly. The server may send `value`
/// in its own display format (`"Tue, 24 Oct 23 10:10:00"`), in which case
/// `timestamp` is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTime {
    pub value: Option<String>,
    pub timestamp: Option<i64>,
}

impl DateTime {
    /// Encode a domain timestamp in its wire form.
    pub fn serialize(t: &Timestamp) -> Self {
        Self {
            value: Some(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            timestamp: Some(t.timestamp()),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "value": self.value, "timestamp": self.timestamp })
    }

    /// The text passed as a mutation argument (`until`).
    ///
    /// Same text as the `value` half of [`Self::serialize`]. Relies on the
    /// server accepting RFC 3339 for `until`, as it does for `DateTime` input
    /// values written by the client.
    pub fn argument(t: &Timestamp) -> String {
        t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Resolve to a domain timestamp.
    pub fn resolve(&self) -> Result<Timestamp, Error> {
        if let Some(parsed) = self
            .value
            .as_deref()
            .and_then(|v| chrono::DateTime::parse_from_rfc3339(v).ok())
        {
            return Ok(parsed.with_timezone(&Utc));
        }

        let ts = self.timestamp.ok_or_else(|| {
            Error::decode(
                Self::TYPE_NAME,
                "no RFC 3339 value and no timestamp to fall back on",
            )
        })?;
        chrono::DateTime::from_timestamp(ts, 0).ok_or_else(|| {
            Error::decode(Self::TYPE_NAME, format!("timestamp {ts} out of range"))
        })
    }
}

impl Decode for DateTime {
    const TYPE_NAME: &'static str = "DateTime";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::scalar("value", ScalarType::String),
        FieldDef::scalar("timestamp", ScalarType::Int),
    ];

    fn decode(value: &Value) -> Result<Self, Error> {
        let f = Fields::of::<Self>(value)?;
        Ok(Self {
            value: f.opt_string("value")?,
            timestamp: f.opt_int("timestamp")?,
        })
    }
}

impl Decode for Timestamp {
    const TYPE_NAME: &'static str = DateTime::TYPE_NAME;
    const FIELDS: &'static [FieldDef] = DateTime::FIELDS;

    fn decode(value: &Value) -> Result<Self, Error> {
        DateTime::decode(value)?.resolve()
    }
}

// ── User ────────────────────────────────────────────────────────────

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub customer_id: i64,
    pub name: String,
    pub email: String,
}

impl Decode for User {
    const TYPE_NAME: &'static str = "User";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::scalar("id", ScalarType::Int),
        FieldDef::scalar("customerId", ScalarType::Int),
        FieldDef::scalar("name", ScalarType::String),
        FieldDef::scalar("email", ScalarType::String),
    ];

    fn decode(value: &Value) -> Result<Self, Error> {
        let f = Fields::of::<Self>(value)?;
        Ok(Self {
            id: f.int("id")?,
            customer_id: f.int("customerId")?,
            name: f.string("name")?,
            email: f.string("email")?,
        })
    }
}

// ── Controller ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerHardware {
    pub serial_number: Option<String>,
    pub version: Option<String>,
}

impl Decode for ControllerHardware {
    const TYPE_NAME: &'static str = "ControllerHardware";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::scalar("serialNumber", ScalarType::String),
        FieldDef::scalar("version", ScalarType::String),
    ];

    fn decode(value: &Value) -> Result<Self, Error> {
        let f = Fields::of::<Self>(value)?;
        Ok(Self {
            serial_number: f.opt_string("serialNumber")?,
            version: f.opt_string("version")?,
        })
    }
}

/// An irrigation controller. Its zones are fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controller {
    pub id: i64,
    pub name: String,
    pub software_version: String,
    pub online: bool,
    pub last_contact_time: Option<Timestamp>,
    pub hardware: ControllerHardware,
}

impl Decode for Controller {
    const TYPE_NAME: &'static str = "Controller";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::scalar("id", ScalarType::Int),
        FieldDef::scalar("name", ScalarType::String),
        FieldDef::scalar("softwareVersion", ScalarType::String),
        FieldDef::scalar("online", ScalarType::Boolean),
        FieldDef::object("lastContactTime", DateTime::TYPE_NAME),
        FieldDef::object("hardware", ControllerHardware::TYPE_NAME),
    ];

    fn decode(value: &Value) -> Result<Self, Error> {
        let f = Fields::of::<Self>(value)?;
        Ok(Self {
            id: f.int("id")?,
            name: f.string("name")?,
            software_version: f.string("softwareVersion")?,
            online: f.boolean("online")?,
            last_contact_time: f.opt_object("lastContactTime")?,
            hardware: f.object("hardware")?,
        })
    }
}

// ── Zone ────────────────────────────────────────────────────────────

/// A watering zone on one controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: i64,
    pub controller_id: i64,
    pub number: i64,
    pub name: String,
    pub running: bool,
    /// Seconds left in the current run, when running.
    pub remaining_run_time: Option<i64>,
    pub suspensions: Vec<ZoneSuspension>,
}

impl Zone {
    pub fn is_suspended(&self) -> bool {
        !self.suspensions.is_empty()
    }
}

impl Decode for Zone {
    const TYPE_NAME: &'static str = "Zone";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::scalar("id", ScalarType::Int),
        FieldDef::scalar("controllerId", ScalarType::Int),
        FieldDef::scalar("number", ScalarType::Int),
        FieldDef::scalar("name", ScalarType::String),
        FieldDef::scalar("running", ScalarType::Boolean),
        FieldDef::scalar("remainingRunTime", ScalarType::Int),
        FieldDef::list("suspensions", ZoneSuspension::TYPE_NAME),
    ];

    fn decode(value: &Value) -> Result<Self, Error> {
        let f = Fields::of::<Self>(value)?;
        Ok(Self {
            id: f.int("id")?,
            controller_id: f.int("controllerId")?,
            number: f.int("number")?,
            name: f.string("name")?,
            running: f.boolean("running")?,
            remaining_run_time: f.opt_int("remainingRunTime")?,
            suspensions: f.list("suspensions")?,
        })
    }
}

/// A temporary override that disables a zone's schedule until `until`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSuspension {
    pub id: i64,
    pub zone_id: i64,
    pub until: Timestamp,
}

impl Decode for ZoneSuspension {
    const TYPE_NAME: &'static str = "ZoneSuspension";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::scalar("id", ScalarType::Int),
        FieldDef::scalar("zoneId", ScalarType::Int),
        FieldDef::object("until", DateTime::TYPE_NAME),
    ];

    fn decode(value: &Value) -> Result<Self, Error> {
        let f = Fields::of::<Self>(value)?;
        Ok(Self {
            id: f.int("id")?,
            zone_id: f.int("zoneId")?,
            until: f.object("until")?,
        })
    }
}

// ── Mutation results ────────────────────────────────────────────────

/// Result shape of most mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCodeAndSummary {
    pub status: String,
    pub summary: Option<String>,
}

impl StatusCodeAndSummary {
    pub const OK: &'static str = "OK";

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

impl Decode for StatusCodeAndSummary {
    const TYPE_NAME: &'static str = "StatusCodeAndSummary";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::scalar("status", ScalarType::String),
        FieldDef::scalar("summary", ScalarType::String),
    ];

    fn decode(value: &Value) -> Result<Self, Error> {
        let f = Fields::of::<Self>(value)?;
        Ok(Self {
            status: f.string("status")?,
            summary: f.opt_string("summary")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn zone_json(id: i64) -> Value {
        json!({
            "id": id,
            "controllerId": 9,
            "number": id,
            "name": format!("Zone {id}"),
            "running": false,
            "remainingRunTime": null,
            "suspensions": []
        })
    }

    #[test]
    fn decodes_user_ignoring_unknown_fields() {
        let user: User = deserialize(&json!({
            "id": 1,
            "customerId": 2,
            "name": "Jane",
            "email": "jane@example.com",
            "favouriteColour": "green"
        }))
        .unwrap();
        assert_eq!(user.customer_id, 2);
        assert_eq!(user.email, "jane@example.com");
    }

    #[test]
    fn missing_field_names_type_and_field() {
        let err = deserialize::<User>(&json!({ "id": 1, "name": "x", "email": "y" })).unwrap_err();
        match err {
            Error::Deserialization { type_name, message } => {
                assert_eq!(type_name, "User");
                assert!(message.contains("customerId"), "{message}");
            }
            other => panic!("expected Deserialization, got: {other:?}"),
        }
    }

    #[test]
    fn wrong_scalar_type_is_rejected() {
        let err = deserialize::<User>(&json!({
            "id": "1", "customerId": 2, "name": "x", "email": "y"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("expected an integer"), "{err}");
    }

    #[test]
    fn empty_list_decodes_empty() {
        let zones: Vec<Zone> = deserialize(&json!([])).unwrap();
        assert!(zones.is_empty());
    }

    #[test]
    fn list_preserves_order() {
        let zones: Vec<Zone> = deserialize(&json!([zone_json(5), zone_json(3)])).unwrap();
        assert_eq!(zones[0], Zone::decode(&zone_json(5)).unwrap());
        assert_eq!(zones[1], Zone::decode(&zone_json(3)).unwrap());
    }

    #[test]
    fn list_fails_as_a_whole() {
        let mut broken = zone_json(4);
        broken.as_object_mut().unwrap().remove("id");
        let err = deserialize::<Vec<Zone>>(&json!([zone_json(1), broken])).unwrap_err();
        assert!(matches!(err, Error::Deserialization { type_name: "Zone", .. }));
    }

    #[test]
    fn list_rejects_non_list() {
        let err = deserialize::<Vec<Zone>>(&json!({})).unwrap_err();
        assert!(err.to_string().contains("expected a list"), "{err}");
    }

    #[test]
    fn zone_with_suspension() {
        let zone: Zone = deserialize(&json!({
            "id": 11,
            "controllerId": 9,
            "number": 1,
            "name": "Front lawn",
            "running": true,
            "remainingRunTime": 120,
            "suspensions": [{
                "id": 3,
                "zoneId": 11,
                "until": { "value": "Tue, 24 Oct 23 10:10:00", "timestamp": 1_698_142_200 }
            }]
        }))
        .unwrap();
        assert!(zone.is_suspended());
        assert_eq!(zone.remaining_run_time, Some(120));
        assert_eq!(
            zone.suspensions[0].until,
            Utc.with_ymd_and_hms(2023, 10, 24, 10, 10, 0).unwrap()
        );
    }

    #[test]
    fn null_suspensions_decode_empty() {
        let mut value = zone_json(2);
        value["suspensions"] = Value::Null;
        let zone: Zone = deserialize(&value).unwrap();
        assert!(!zone.is_suspended());
    }

    #[test]
    fn controller_with_nested_objects() {
        let controller: Controller = deserialize(&json!({
            "id": 9,
            "name": "Backyard",
            "softwareVersion": "2.1",
            "online": true,
            "lastContactTime": { "value": "2024-05-01T08:00:00Z", "timestamp": 1_714_550_400 },
            "hardware": { "serialNumber": "A1B2", "version": null }
        }))
        .unwrap();
        assert_eq!(controller.hardware.serial_number.as_deref(), Some("A1B2"));
        assert_eq!(controller.hardware.version, None);
        assert_eq!(
            controller.last_contact_time,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn datetime_round_trips() {
        let cases = [
            Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 15).unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
        ];
        for t in cases {
            let wire = DateTime::serialize(&t).to_json();
            let back: Timestamp = deserialize(&wire).unwrap();
            assert_eq!(back, t, "round trip of {wire}");
        }
    }

    #[test]
    fn datetime_wire_shape() {
        let t = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 15).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(
            DateTime::serialize(&t).to_json(),
            json!({ "value": "2024-02-29T12:30:15.250Z", "timestamp": 1_709_209_815 })
        );
    }

    #[test]
    fn datetime_argument_matches_wire_value() {
        let t = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(DateTime::argument(&t), "2030-01-02T03:04:05Z");
        assert_eq!(
            Some(DateTime::argument(&t)),
            DateTime::serialize(&t).value
        );
    }

    #[test]
    fn datetime_falls_back_to_timestamp() {
        let t: Timestamp = deserialize(&json!({ "value": null, "timestamp": 0 })).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn datetime_without_anything_fails() {
        let err = deserialize::<Timestamp>(&json!({ "value": "soon" })).unwrap_err();
        assert!(matches!(err, Error::Deserialization { type_name: "DateTime", .. }));
    }

    #[test]
    fn status_code_and_summary() {
        let ok: StatusCodeAndSummary = deserialize(&json!({ "status": "OK" })).unwrap();
        assert!(ok.is_ok());
        let busy: StatusCodeAndSummary =
            deserialize(&json!({ "status": "ERROR", "summary": "zone busy" })).unwrap();
        assert!(!busy.is_ok());
        assert_eq!(busy.summary.as_deref(), Some("zone busy"));
    }
}
