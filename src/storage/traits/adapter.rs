//! Adapter contract.
//!
//! Every storage engine implements [`GraphAdapter`]. The trait is generic over
//! three backend-native handle types so advanced callers can reach the driver
//! without the adapter hiding it:
//!
//! | Backend | `Driver` | `Session` | `QueryResult` |
//! |---------|----------|-----------|---------------|
//! | `Neo4jAdapter` | `neo4rs::Graph` | `neo4rs::Txn` | `Neo4jRows` (buffered, committed) |
//! | `SurrealDbAdapter` | `Surreal<Any>` | guarded `Surreal<Any>` | `QueryEnvelope` |
//!
//! # Lifecycle
//!
//! ```text
//! +--------------+   connect() ok    +-----------+
//! | Disconnected | ----------------> | Connected |
//! +--------------+ <---------------- +-----------+
//!        ^            close()              |
//!        |                                 | execute_query, build_indices,
//!        +-- connect() error               | clear_all_data, get_episodes, ...
//! ```
//!
//! Every operation other than `connect` and `close` fails with
//! [`crate::Error::NotConnected`] while disconnected. Adapters never connect
//! lazily, never retry, and impose no timeouts of their own.

use crate::Result;
use crate::models::{Parameters, Record};
use async_trait::async_trait;
use secrecy::SecretString;

/// Connection parameters handed to [`GraphAdapter::connect`].
///
/// `namespace` and `database` are only read by scoped backends; other backends
/// ignore them.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Server URI (`bolt://`, `neo4j://`, `ws://`, `http://`, ...).
    pub uri: String,
    /// User name. Scoped backends skip authentication when empty.
    pub user: String,
    /// Password.
    pub password: SecretString,
    /// Namespace for scoped backends.
    pub namespace: Option<String>,
    /// Database scope for scoped backends.
    pub database: Option<String>,
}

impl ConnectOptions {
    /// Creates options without a namespace or database scope.
    pub fn new(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: SecretString::from(password.into()),
            namespace: None,
            database: None,
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the database scope.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// Contract every graph storage backend satisfies.
///
/// # Implementor Notes
///
/// - Methods take `&self`; connection state lives behind interior mutability
///   and is owned by the adapter instance, never by a process-wide global
/// - A failed `connect` must leave the adapter disconnected and reusable
/// - A failed query must leave the connection intact
/// - Absence on reads is `Ok(None)` / an empty `Vec`, never an error
/// - Wrap driver errors with [`crate::Error::query_failure`] so the native
///   error stays reachable through `source()`
#[async_trait]
pub trait GraphAdapter: Send + Sync + 'static {
    /// Native driver handle returned by [`GraphAdapter::get_driver`].
    type Driver: Send;
    /// Native unit-of-work handle returned by [`GraphAdapter::get_session`].
    type Session: Send;
    /// Native result returned by [`GraphAdapter::execute_query`].
    type QueryResult: Send;

    /// Registered tag of this backend, used in errors, logs and metrics.
    fn backend_name(&self) -> &'static str;

    /// Returns true while connected.
    async fn is_connected(&self) -> bool;

    /// Establishes the connection and verifies it with a trivial round trip.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ConnectionFailure`] when authentication, scope
    /// selection, or the reachability probe fails.
    async fn connect(&self, options: &ConnectOptions) -> Result<()>;

    /// Releases the connection. A no-op when already disconnected.
    async fn close(&self) -> Result<()>;

    /// Returns the native driver handle.
    async fn get_driver(&self) -> Result<Self::Driver>;

    /// Opens a native session.
    async fn get_session(&self) -> Result<Self::Session>;

    /// Executes a query in the backend's native language.
    ///
    /// The text is passed through verbatim; `parameters` are bound separately.
    async fn execute_query(&self, query: &str, parameters: Parameters)
    -> Result<Self::QueryResult>;

    /// Provisions the uniqueness, not-null and index schema.
    ///
    /// Idempotent when `delete_existing` is false. When true, existing schema
    /// objects are dropped first.
    async fn build_indices(&self, delete_existing: bool) -> Result<()>;

    /// Removes every entity and relationship. Irreversible.
    async fn clear_all_data(&self) -> Result<()>;

    /// Returns all episodes, newest `created_at` first.
    async fn get_episodes(&self) -> Result<Vec<Record>>;

    /// Returns one episode by id, or `None` when it does not exist.
    async fn get_one_episode(&self, episode_id: &str) -> Result<Option<Record>>;
}
