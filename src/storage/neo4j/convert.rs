//! JSON to Bolt parameter conversion and node to record conversion.

use crate::models::{Parameters, Record};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use neo4rs::{
    BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNull, BoltString, BoltType, Node,
    Query,
};
use serde_json::Value;

/// Converts a JSON value into a Bolt value.
///
/// Integers outside the `i64` range are sent as floats.
pub fn json_to_bolt(value: Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::Boolean(BoltBoolean::new(b)),
        Value::Number(n) => n.as_i64().map_or_else(
            || BoltType::Float(BoltFloat::new(n.as_f64().unwrap_or(f64::NAN))),
            |i| BoltType::Integer(BoltInteger::new(i)),
        ),
        Value::String(s) => BoltType::String(BoltString::new(&s)),
        Value::Array(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(json_to_bolt(item));
            }
            BoltType::List(list)
        },
        Value::Object(entries) => {
            let mut map = BoltMap::new();
            for (key, item) in entries {
                map.put(BoltString::new(&key), json_to_bolt(item));
            }
            BoltType::Map(map)
        },
    }
}

/// Binds every parameter onto `query`.
pub fn bind(mut query: Query, parameters: Parameters) -> Query {
    for (key, value) in parameters {
        query = query.param(&key, json_to_bolt(value));
    }
    query
}

/// Converts node properties into a record.
///
/// Temporal properties become RFC 3339 strings, with `Z` for UTC. Properties
/// with no JSON form (points, durations) are skipped.
pub fn node_to_record(node: &Node) -> Record {
    let mut record = Record::new();
    for key in node.keys() {
        match property_value(node, key) {
            Some(value) => {
                record.insert(key.to_string(), value);
            },
            None => tracing::debug!(property = key, "skipping property without JSON form"),
        }
    }
    record
}

fn property_value(node: &Node, key: &str) -> Option<Value> {
    let rendered = match node.get::<BoltType>(key).ok()? {
        BoltType::String(s) => return Some(Value::String(s.value)),
        BoltType::DateTime(dt) => DateTime::<FixedOffset>::try_from(&dt).ok().map(rfc3339),
        BoltType::DateTimeZoneId(dt) => DateTime::<FixedOffset>::try_from(&dt).ok().map(rfc3339),
        BoltType::LocalDateTime(dt) => NaiveDateTime::try_from(&dt)
            .ok()
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        BoltType::Date(date) => NaiveDate::try_from(&date)
            .ok()
            .map(|date| date.format("%Y-%m-%d").to_string()),
        _ => return node.get::<Value>(key).ok(),
    };
    rendered.map(Value::String)
}

fn rfc3339(dt: DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
