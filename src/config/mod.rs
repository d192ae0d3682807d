//! Connection configuration.
//!
//! Settings resolve in this order, later sources winning:
//!
//! 1. Per-backend defaults
//! 2. The `[database]` table of a TOML config file
//! 3. Environment variables
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `DATABASE_TYPE` | `neo4j` (default) or `surrealdb`, case-insensitive |
//! | `DATABASE_URI` | Server URI (`NEO4J_URI` is read as a fallback for Neo4j) |
//! | `DATABASE_USER` | User name (`NEO4J_USER` fallback) |
//! | `DATABASE_PASSWORD` | Password (`NEO4J_PASSWORD` fallback) |
//! | `DATABASE_NAMESPACE` | SurrealDB namespace |
//! | `DATABASE_DB` | SurrealDB database |
//!
//! Empty variables count as unset.

use crate::models::DatabaseType;
use crate::storage::ConnectOptions;
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Selects the backend.
pub const ENV_DATABASE_TYPE: &str = "DATABASE_TYPE";
/// Server URI.
pub const ENV_DATABASE_URI: &str = "DATABASE_URI";
/// User name.
pub const ENV_DATABASE_USER: &str = "DATABASE_USER";
/// Password.
pub const ENV_DATABASE_PASSWORD: &str = "DATABASE_PASSWORD";
/// SurrealDB namespace.
pub const ENV_DATABASE_NAMESPACE: &str = "DATABASE_NAMESPACE";
/// SurrealDB database.
pub const ENV_DATABASE_DB: &str = "DATABASE_DB";

const LEGACY_NEO4J: [(&str, &str); 3] = [
    (ENV_DATABASE_URI, "NEO4J_URI"),
    (ENV_DATABASE_USER, "NEO4J_USER"),
    (ENV_DATABASE_PASSWORD, "NEO4J_PASSWORD"),
];

/// `[database]` table of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFileDatabase {
    /// Backend tag.
    #[serde(rename = "type")]
    pub database_type: Option<String>,
    /// Server URI.
    pub uri: Option<String>,
    /// User name.
    pub user: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// SurrealDB namespace.
    pub namespace: Option<String>,
    /// SurrealDB database.
    pub database: Option<String>,
}

/// Root of the TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Connection settings.
    pub database: Option<ConfigFileDatabase>,
}

/// Resolved connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDbConfig {
    /// Selected backend.
    pub database_type: DatabaseType,
    /// Server URI.
    pub uri: String,
    /// User name.
    pub user: String,
    /// Password. Serialized as a placeholder.
    #[serde(with = "secret_string_serde")]
    pub password: SecretString,
    /// Namespace for scoped backends.
    pub namespace: Option<String>,
    /// Database for scoped backends.
    pub database: Option<String>,
}

impl Default for GraphDbConfig {
    fn default() -> Self {
        Self::defaults_for(DatabaseType::default())
    }
}

impl GraphDbConfig {
    /// Returns the defaults for a backend.
    #[must_use]
    pub fn defaults_for(database_type: DatabaseType) -> Self {
        match database_type {
            DatabaseType::Neo4j => Self {
                database_type,
                uri: "bolt://localhost:7687".to_string(),
                user: "neo4j".to_string(),
                password: SecretString::from("neo4j"),
                namespace: None,
                database: None,
            },
            DatabaseType::SurrealDb => Self {
                database_type,
                uri: "ws://localhost:8001/rpc".to_string(),
                user: "root".to_string(),
                password: SecretString::from("root"),
                namespace: Some("graphiti".to_string()),
                database: Some("graphiti".to_string()),
            },
        }
    }

    /// Resolves configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBackend`] for an unknown `DATABASE_TYPE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBackend`] for an unknown `DATABASE_TYPE`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(None, lookup)
    }

    /// Loads a config file, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] when the file cannot be read or
    /// parsed, and [`Error::UnsupportedBackend`] for an unknown type.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::load_from_file_with(path, |key| std::env::var(key).ok())
    }

    /// Loads a config file, then applies overrides from `lookup`.
    ///
    /// # Errors
    ///
    /// See [`GraphDbConfig::load_from_file`].
    pub fn load_from_file_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Self::resolve(file.database, lookup)
    }

    /// Platform config path: `<config dir>/graphdb/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("graphdb").join("config.toml"))
    }

    /// Loads the default config file when present, otherwise the environment.
    ///
    /// # Errors
    ///
    /// See [`GraphDbConfig::load_from_file`].
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Self::from_env(),
        }
    }

    fn resolve<F>(file: Option<ConfigFileDatabase>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_type = match env(ENV_DATABASE_TYPE).or(file.database_type) {
            Some(tag) => tag.parse::<DatabaseType>()?,
            None => DatabaseType::default(),
        };
        let mut config = Self::defaults_for(database_type);

        if let Some(uri) = file.uri {
            config.uri = uri;
        }
        if let Some(user) = file.user {
            config.user = user;
        }
        if let Some(password) = file.password {
            config.password = SecretString::from(password);
        }
        if file.namespace.is_some() {
            config.namespace = file.namespace;
        }
        if file.database.is_some() {
            config.database = file.database;
        }

        let env_or_legacy = |key: &str| {
            env(key).or_else(|| {
                if database_type != DatabaseType::Neo4j {
                    return None;
                }
                LEGACY_NEO4J
                    .iter()
                    .find(|(current, _)| *current == key)
                    .and_then(|&(_, legacy)| env(legacy))
            })
        };

        if let Some(uri) = env_or_legacy(ENV_DATABASE_URI) {
            config.uri = uri;
        }
        if let Some(user) = env_or_legacy(ENV_DATABASE_USER) {
            config.user = user;
        }
        if let Some(password) = env_or_legacy(ENV_DATABASE_PASSWORD) {
            config.password = SecretString::from(password);
        }
        if let Some(namespace) = env(ENV_DATABASE_NAMESPACE) {
            config.namespace = Some(namespace);
        }
        if let Some(database) = env(ENV_DATABASE_DB) {
            config.database = Some(database);
        }

        Ok(config)
    }

    /// Checks that the configuration can be used to connect.
    ///
    /// SurrealDB may run without a user, in which case signin is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first missing value.
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(Error::InvalidInput("database uri is empty".to_string()));
        }
        if self.user.trim().is_empty() {
            if !self.database_type.is_scoped() {
                return Err(Error::InvalidInput(format!(
                    "{} user is empty",
                    self.database_type
                )));
            }
        } else if self.password.expose_secret().is_empty() {
            return Err(Error::InvalidInput(format!(
                "{} password is empty",
                self.database_type
            )));
        }
        for (name, value) in [("namespace", &self.namespace), ("database", &self.database)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(Error::InvalidInput(format!("{name} is empty")));
            }
        }
        Ok(())
    }

    /// Builds adapter connect options.
    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(
            self.uri.clone(),
            self.user.clone(),
            self.password.expose_secret(),
        );
        if self.database_type.is_scoped() {
            options.namespace.clone_from(&self.namespace);
            options.database.clone_from(&self.database);
        }
        options
    }

    /// One-line summary with the password masked.
    #[must_use]
    pub fn redacted(&self) -> String {
        let mut summary = format!(
            "type={} uri={} user={} password=***",
            self.database_type, self.uri, self.user
        );
        if self.database_type.is_scoped() {
            summary.push_str(&format!(
                " namespace={} database={}",
                self.namespace.as_deref().unwrap_or("-"),
                self.database.as_deref().unwrap_or("-")
            ));
        }
        summary
    }
}

/// Serde helper that never writes the secret.
mod secret_string_serde {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(_secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("***REDACTED***")
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_defaults_to_neo4j() {
        let config = GraphDbConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config.database_type, DatabaseType::Neo4j);
        assert_eq!(config.uri, "bolt://localhost:7687");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.password.expose_secret(), "neo4j");
        assert!(config.namespace.is_none());
    }

    #[test]
    fn test_surrealdb_defaults() {
        let config =
            GraphDbConfig::from_lookup(lookup(&[("DATABASE_TYPE", "SurrealDB")])).expect("config");
        assert_eq!(config.database_type, DatabaseType::SurrealDb);
        assert_eq!(config.uri, "ws://localhost:8001/rpc");
        assert_eq!(config.user, "root");
        assert_eq!(config.namespace.as_deref(), Some("graphiti"));
        assert_eq!(config.database.as_deref(), Some("graphiti"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = GraphDbConfig::from_lookup(lookup(&[("DATABASE_TYPE", "mongo")]))
            .expect_err("unsupported");
        assert!(matches!(err, Error::UnsupportedBackend(tag) if tag == "mongo"));
    }

    #[test]
    fn test_generic_variables_override_defaults() {
        let config = GraphDbConfig::from_lookup(lookup(&[
            ("DATABASE_TYPE", "surrealdb"),
            ("DATABASE_URI", "ws://db:8000/rpc"),
            ("DATABASE_USER", "admin"),
            ("DATABASE_PASSWORD", "s3cret"),
            ("DATABASE_NAMESPACE", "prod"),
            ("DATABASE_DB", "graph"),
        ]))
        .expect("config");
        assert_eq!(config.uri, "ws://db:8000/rpc");
        assert_eq!(config.user, "admin");
        assert_eq!(config.password.expose_secret(), "s3cret");
        assert_eq!(config.namespace.as_deref(), Some("prod"));
        assert_eq!(config.database.as_deref(), Some("graph"));
    }

    #[test_case(&[("NEO4J_URI", "bolt://legacy:7687")], "bolt://legacy:7687" ; "legacy only")]
    #[test_case(
        &[("NEO4J_URI", "bolt://legacy:7687"), ("DATABASE_URI", "bolt://new:7687")],
        "bolt://new:7687" ; "generic wins"
    )]
    #[test_case(
        &[("DATABASE_URI", ""), ("NEO4J_URI", "bolt://legacy:7687")],
        "bolt://legacy:7687" ; "empty generic ignored"
    )]
    fn test_neo4j_legacy_fallback(vars: &[(&str, &str)], expected: &str) {
        let config = GraphDbConfig::from_lookup(lookup(vars)).expect("config");
        assert_eq!(config.uri, expected);
    }

    #[test]
    fn test_legacy_variables_ignored_for_surrealdb() {
        let config = GraphDbConfig::from_lookup(lookup(&[
            ("DATABASE_TYPE", "surrealdb"),
            ("NEO4J_URI", "bolt://legacy:7687"),
            ("NEO4J_USER", "legacy"),
        ]))
        .expect("config");
        assert_eq!(config.uri, "ws://localhost:8001/rpc");
        assert_eq!(config.user, "root");
    }

    #[test]
    fn test_load_from_file_with_env_override() {
        let file = write_config(
            r#"
[database]
type = "surrealdb"
uri = "http://file:8000"
user = "file-user"
password = "file-pass"
namespace = "file-ns"
"#,
        );

        let config =
            GraphDbConfig::load_from_file_with(file.path(), lookup(&[("DATABASE_USER", "env-user")]))
                .expect("config");
        assert_eq!(config.database_type, DatabaseType::SurrealDb);
        assert_eq!(config.uri, "http://file:8000");
        assert_eq!(config.user, "env-user");
        assert_eq!(config.password.expose_secret(), "file-pass");
        assert_eq!(config.namespace.as_deref(), Some("file-ns"));
        assert_eq!(config.database.as_deref(), Some("graphiti"));
    }

    #[test]
    fn test_env_type_overrides_file_type() {
        let file = write_config("[database]\ntype = \"surrealdb\"\n");
        let config =
            GraphDbConfig::load_from_file_with(file.path(), lookup(&[("DATABASE_TYPE", "neo4j")]))
                .expect("config");
        assert_eq!(config.database_type, DatabaseType::Neo4j);
        assert_eq!(config.uri, "bolt://localhost:7687");
    }

    #[test]
    fn test_load_from_file_errors() {
        let missing =
            GraphDbConfig::load_from_file_with(Path::new("/nonexistent/graphdb.toml"), lookup(&[]));
        assert!(matches!(
            missing,
            Err(Error::OperationFailed { ref operation, .. }) if operation == "read_config_file"
        ));

        let file = write_config("[database\nuri =");
        let malformed = GraphDbConfig::load_from_file_with(file.path(), lookup(&[]));
        assert!(matches!(
            malformed,
            Err(Error::OperationFailed { ref operation, .. }) if operation == "parse_config_file"
        ));
    }

    #[test]
    fn test_validate() {
        assert!(GraphDbConfig::default().validate().is_ok());

        let mut config = GraphDbConfig::default();
        config.uri = " ".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));

        let mut config = GraphDbConfig::default();
        config.user = String::new();
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));

        let mut config = GraphDbConfig::defaults_for(DatabaseType::SurrealDb);
        config.user = String::new();
        config.password = SecretString::from("");
        assert!(config.validate().is_ok());

        let mut config = GraphDbConfig::defaults_for(DatabaseType::SurrealDb);
        config.namespace = Some(String::new());
        assert!(matches!(config.validate(), Err(Error::InvalidInput(msg)) if msg.contains("namespace")));
    }

    #[test]
    fn test_connect_options_scope() {
        let neo4j = GraphDbConfig::default().connect_options();
        assert!(neo4j.namespace.is_none());
        assert_eq!(neo4j.uri, "bolt://localhost:7687");

        let surreal = GraphDbConfig::defaults_for(DatabaseType::SurrealDb).connect_options();
        assert_eq!(surreal.namespace.as_deref(), Some("graphiti"));
        assert_eq!(surreal.database.as_deref(), Some("graphiti"));
        assert_eq!(surreal.password.expose_secret(), "root");
    }

    #[test]
    fn test_password_never_displayed() {
        let mut config = GraphDbConfig::defaults_for(DatabaseType::SurrealDb);
        config.password = SecretString::from("hunter2");

        let summary = config.redacted();
        assert!(!summary.contains("hunter2"));
        assert!(summary.contains("namespace=graphiti"));

        let json = serde_json::to_string(&config).expect("serialize");
        assert!(!json.contains("hunter2"));
        assert!(json.contains("***REDACTED***"));
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
