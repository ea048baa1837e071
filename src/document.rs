//! Untyped documents as returned by the document store.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// A raw key/value document.
///
/// The id is assigned by the store and is always present; everything in
/// `fields` is best-effort and may be missing, renamed, or of the wrong type
/// depending on which generation of writer produced the document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a document from any JSON value. Non-object values yield an
    /// empty field map.
    pub fn from_value(id: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn str_field(&self, field: &str) -> Option<String> {
        self.get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Resolve a string through an ordered alias list; the first alias that
    /// is present with a string value wins.
    pub fn first_str(&self, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|field| self.str_field(field))
    }

    /// Resolve a boolean through an ordered alias list.
    pub fn first_bool(&self, aliases: &[&str]) -> Option<bool> {
        aliases.iter().find_map(|field| self.bool_field(field))
    }

    /// Decode a timestamp-shaped field, see [`decode_instant`].
    pub fn instant(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field).and_then(decode_instant)
    }

    pub fn first_instant(&self, aliases: &[&str]) -> Option<DateTime<Utc>> {
        aliases.iter().find_map(|field| self.instant(field))
    }
}

/// Epoch values at or above this are taken as milliseconds, not seconds.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

/// Decode the timestamp encodings seen across schema generations:
///
/// 1. an RFC 3339 string,
/// 2. an integer epoch (seconds, or milliseconds above the cutoff),
/// 3. the store's wrapped form: an object with `seconds`/`nanos`
///    (also accepted in its serialized `_seconds`/`_nanoseconds` spelling).
///
/// Anything else resolves to `None` rather than erroring.
pub fn decode_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            if raw.abs() >= EPOCH_MILLIS_CUTOFF {
                Utc.timestamp_millis_opt(raw).single()
            } else {
                Utc.timestamp_opt(raw, 0).single()
            }
        }
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanos")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, nanos.clamp(0, 999_999_999) as u32)
                .single()
        }
        _ => None,
    }
}
