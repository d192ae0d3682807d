//! Data models shared by every backend.
//!
//! This module holds the database-type tag, the record and parameter maps
//! exchanged with adapters, and the canonical schema both backends provision.

mod database_type;
mod record;
pub mod schema;

pub use database_type::DatabaseType;
pub use record::{Parameters, Record, parameters_from_json};
pub use schema::{EPISODE_LABEL, FieldKind, FieldSpec, RELATIONSHIPS, SCHEMA, TableSpec};
