//! Database-type tags.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage engines with a built-in adapter.
///
/// Tags parse case-insensitively, so `"Neo4j"`, `"NEO4J"` and `" neo4j "` all
/// select [`DatabaseType::Neo4j`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// Bolt-protocol property graph server.
    #[default]
    Neo4j,
    /// Namespace/database scoped multi-model server.
    #[serde(rename = "surrealdb", alias = "surreal")]
    SurrealDb,
}

impl DatabaseType {
    /// Returns all built-in database types.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Neo4j, Self::SurrealDb]
    }

    /// Returns the canonical tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neo4j => "neo4j",
            Self::SurrealDb => "surrealdb",
        }
    }

    /// Parses a tag, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let tag = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(tag))
    }

    /// Returns true when the backend needs a namespace and database scope.
    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        matches!(self, Self::SurrealDb)
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::UnsupportedBackend(s.trim().to_string()))
    }
}
