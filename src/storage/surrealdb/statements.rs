//! SurrealQL rendered from the canonical schema.
//!
//! Uniqueness of `id` is carried by the record id itself (`Episode:⟨ep-1⟩`),
//! so no unique index is declared for it.

use crate::models::{EPISODE_LABEL, FieldKind, FieldSpec, RELATIONSHIPS, SCHEMA};

/// Reachability probe issued by `connect`.
pub const PROBE: &str = "RETURN 1";

/// Lists every episode, newest first.
pub fn list_episodes() -> String {
    format!("SELECT * FROM {EPISODE_LABEL} ORDER BY created_at DESC")
}

/// Fetches one episode by `$episode_id`.
pub fn one_episode() -> String {
    format!("SELECT * FROM type::thing('{EPISODE_LABEL}', $episode_id)")
}

fn field_type(field: &FieldSpec) -> String {
    let base = match field.kind {
        FieldKind::String => "string",
        FieldKind::Datetime => "datetime",
        FieldKind::Object => "object",
    };
    let ty = if field.required {
        base.to_string()
    } else {
        format!("option<{base}>")
    };
    if field.kind == FieldKind::Object {
        format!("FLEXIBLE TYPE {ty}")
    } else {
        format!("TYPE {ty}")
    }
}

/// Returns the idempotent schema declarations: node tables with their fields
/// and indexes, then relation tables.
pub fn schema_statements() -> Vec<String> {
    let mut statements = Vec::new();

    for table in SCHEMA {
        statements.push(format!(
            "DEFINE TABLE IF NOT EXISTS {} SCHEMAFULL",
            table.label
        ));
        for field in table.fields.iter().filter(|f| f.name != "id") {
            statements.push(format!(
                "DEFINE FIELD IF NOT EXISTS {} ON TABLE {} {}",
                field.name,
                table.label,
                field_type(field)
            ));
        }
        for field in table.indexed_fields() {
            statements.push(format!(
                "DEFINE INDEX IF NOT EXISTS {label}_{field} ON TABLE {label} FIELDS {field}",
                label = table.label,
                field = field.name
            ));
        }
    }

    for relation in RELATIONSHIPS {
        statements.push(format!(
            "DEFINE TABLE IF NOT EXISTS {relation} SCHEMALESS TYPE RELATION"
        ));
    }

    statements
}

/// Returns one `REMOVE TABLE` per node and relation table.
pub fn remove_statements() -> Vec<String> {
    SCHEMA
        .iter()
        .map(|t| t.label)
        .chain(RELATIONSHIPS.iter().copied())
        .map(|table| format!("REMOVE TABLE IF EXISTS {table}"))
        .collect()
}

/// Joins statements into one request.
pub fn batch(statements: &[String]) -> String {
    let mut text = statements.join(";\n");
    text.push(';');
    text
}
