//! Per-statement result envelope.
//!
//! A SurrealQL request may hold several statements; each yields its own
//! outcome. Decoding follows one rule: missing or empty at any level yields no
//! records.
//!
//! | Shape | Records |
//! |-------|---------|
//! | `[]` | none |
//! | `[{"status": "OK"}]` / `"result": null` | none |
//! | `"result": []` | none |
//! | `"result": {...}` | the object |
//! | `"result": [{...}, 3, {...}]` | the two objects |
//! | `"status": "ERR"` | none |
//!
//! Episode reads only want objects. Generic results go through
//! [`QueryEnvelope::rows`] instead, which keeps every value and wraps
//! non-objects as `{"value": v}`.

use crate::models::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const OK: &str = "OK";

/// Field holding a non-object value in [`QueryEnvelope::rows`].
pub const VALUE_FIELD: &str = "value";

fn ok_status() -> String {
    OK.to_string()
}

/// Outcome of one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementOutcome {
    /// `OK` or `ERR`.
    #[serde(default = "ok_status")]
    pub status: String,
    /// Server-reported execution time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Statement result.
    #[serde(default)]
    pub result: Option<Value>,
}

impl StatementOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn ok(result: Value) -> Self {
        Self {
            status: ok_status(),
            time: None,
            result: Some(result),
        }
    }

    /// Returns true when the statement succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case(OK)
    }

    /// Object records carried by this outcome.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        let values: &[Value] = match (self.is_ok(), &self.result) {
            (true, Some(Value::Array(items))) => items,
            (true, Some(value @ Value::Object(_))) => std::slice::from_ref(value),
            _ => &[],
        };
        values.iter().filter_map(Value::as_object)
    }

    /// Every value carried by this outcome, objects as-is and anything else
    /// under [`VALUE_FIELD`].
    pub fn rows(&self) -> impl Iterator<Item = Record> + '_ {
        let values: &[Value] = match (self.is_ok(), &self.result) {
            (true, Some(Value::Array(items))) => items,
            (true, Some(Value::Null) | None) | (false, _) => &[],
            (true, Some(value)) => std::slice::from_ref(value),
        };
        values.iter().map(|value| match value {
            Value::Object(record) => record.clone(),
            other => {
                let mut record = Record::new();
                record.insert(VALUE_FIELD.to_string(), other.clone());
                record
            },
        })
    }
}

/// Outcomes of every statement in one request, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryEnvelope {
    statements: Vec<StatementOutcome>,
}

impl QueryEnvelope {
    /// Wraps statement outcomes.
    #[must_use]
    pub const fn new(statements: Vec<StatementOutcome>) -> Self {
        Self { statements }
    }

    /// Statement outcomes.
    #[must_use]
    pub fn statements(&self) -> &[StatementOutcome] {
        &self.statements
    }

    /// Returns true when there are no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Records of the first statement.
    #[must_use]
    pub fn first_records(&self) -> Vec<Record> {
        self.statements
            .first()
            .map(|s| s.records().cloned().collect())
            .unwrap_or_default()
    }

    /// Records of every successful statement, flattened in order.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.statements
            .iter()
            .flat_map(|s| s.records())
            .cloned()
            .collect()
    }

    /// Rows of every successful statement, flattened in order.
    #[must_use]
    pub fn rows(&self) -> Vec<Record> {
        self.statements.iter().flat_map(StatementOutcome::rows).collect()
    }
}

/// Rewrites `record["id"]` from a record id to its bare key.
///
/// Accepts the string form (`Episode:ep1`, `Episode:⟨ep-1⟩`,
/// ``Episode:`ep-1` ``) and the object form
/// (`{"tb": "Episode", "id": {"String": "ep-1"}}`).
pub fn normalize_record_id(record: &mut Record, table: &str) {
    let Some(id) = record.get("id") else {
        return;
    };
    let key = match id {
        Value::String(s) => Some(bare_key(s, table)),
        Value::Object(thing) => thing.get("id").and_then(thing_key),
        _ => None,
    };
    if let Some(key) = key {
        record.insert("id".to_string(), Value::String(key));
    }
}

fn bare_key(id: &str, table: &str) -> String {
    let key = id
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id);
    unquote(key).to_string()
}

fn unquote(key: &str) -> &str {
    key.strip_prefix('⟨')
        .and_then(|k| k.strip_suffix('⟩'))
        .or_else(|| key.strip_prefix('`').and_then(|k| k.strip_suffix('`')))
        .unwrap_or(key)
}

fn thing_key(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(unquote(s).to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(tagged) => tagged
            .get("String")
            .or_else(|| tagged.get("Number"))
            .and_then(thing_key),
        _ => None,
    }
}
