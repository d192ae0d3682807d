//! Cypher rendered from the canonical schema.

use crate::models::{EPISODE_LABEL, SCHEMA};

/// Reachability probe issued by `connect`.
pub const PROBE: &str = "RETURN 1";

/// Deletes every node together with its relationships.
pub const CLEAR_ALL: &str = "MATCH (n) DETACH DELETE n";

/// Lists constraint names for the schema reset.
pub const SHOW_CONSTRAINTS: &str = "SHOW CONSTRAINTS YIELD name RETURN name";

/// Lists index names for the schema reset. LOOKUP indexes back label scans and
/// cannot be dropped safely.
pub const SHOW_INDEXES: &str =
    "SHOW INDEXES YIELD name, type WHERE type <> 'LOOKUP' RETURN name";

/// Kind of a provisioning statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Uniqueness constraint.
    Unique,
    /// Property existence constraint.
    NotNull,
    /// Range index.
    Index,
}

/// One provisioning statement with its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStatement {
    /// Kind of schema object.
    pub kind: StatementKind,
    /// `Label.field` target, for logging.
    pub target: String,
    /// Cypher text.
    pub cypher: String,
}

/// Returns the idempotent provisioning statements: uniqueness constraints,
/// then existence constraints, then secondary indexes.
pub fn schema_statements() -> Vec<SchemaStatement> {
    let mut statements = Vec::new();

    for table in SCHEMA {
        for field in table.unique_fields() {
            statements.push(SchemaStatement {
                kind: StatementKind::Unique,
                target: format!("{}.{}", table.label, field.name),
                cypher: format!(
                    "CREATE CONSTRAINT IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
                    table.label, field.name
                ),
            });
        }
    }

    for table in SCHEMA {
        for field in table.required_fields() {
            statements.push(SchemaStatement {
                kind: StatementKind::NotNull,
                target: format!("{}.{}", table.label, field.name),
                cypher: format!(
                    "CREATE CONSTRAINT IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS NOT NULL",
                    table.label, field.name
                ),
            });
        }
    }

    for table in SCHEMA {
        for field in table.indexed_fields() {
            statements.push(SchemaStatement {
                kind: StatementKind::Index,
                target: format!("{}.{}", table.label, field.name),
                cypher: format!(
                    "CREATE INDEX IF NOT EXISTS FOR (n:{}) ON (n.{})",
                    table.label, field.name
                ),
            });
        }
    }

    statements
}

/// Lists every episode, newest first.
pub fn list_episodes() -> String {
    format!("MATCH (e:{EPISODE_LABEL}) RETURN e ORDER BY e.created_at DESC")
}

/// Fetches one episode by `$episode_id`.
pub fn one_episode() -> String {
    format!("MATCH (e:{EPISODE_LABEL} {{id: $episode_id}}) RETURN e")
}

/// Drops a constraint by name.
pub fn drop_constraint(name: &str) -> String {
    format!("DROP CONSTRAINT {} IF EXISTS", quote_identifier(name))
}

/// Drops an index by name.
pub fn drop_index(name: &str) -> String {
    format!("DROP INDEX {} IF EXISTS", quote_identifier(name))
}

/// Backtick-quotes a schema object name.
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
