//! SurrealDB backend.
//!
//! One persistent client is created at `connect` time, signed in as a root
//! user, and scoped to a namespace and database. The client sits behind a
//! connection-level mutex that every call holds for its whole round trip, so
//! calls on one adapter are serialized.
//!
//! # Endpoints
//!
//! Any engine compiled into the SDK is accepted (`ws://`, `wss://`, `http://`,
//! `https://`, and `mem://` with the `embedded` feature). A trailing `/rpc` is
//! stripped since the SDK appends it itself.
//!
//! # Results
//!
//! `execute_query` returns a [`QueryEnvelope`] with one outcome per statement.
//! Episode reads decode the envelope and rewrite record ids
//! (`Episode:⟨ep-1⟩`) to their bare key (`ep-1`).

mod envelope;
pub mod statements;

pub use envelope::{QueryEnvelope, StatementOutcome, VALUE_FIELD, normalize_record_id};

use super::instrument::observe;
use super::traits::{ConnectOptions, GraphAdapter, IntoRecords};
use crate::models::{EPISODE_LABEL, Parameters, Record};
use crate::{Error, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::future::IntoFuture;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard, OwnedMappedMutexGuard, OwnedMutexGuard};

/// Registered backend tag.
pub const BACKEND_NAME: &str = "surrealdb";

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "graphiti";

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "graphiti";

/// Exclusive handle on the connected client, released on drop.
pub type SurrealSession = OwnedMappedMutexGuard<Option<SurrealConnection>, Surreal<Any>>;

/// A live, scoped client.
pub struct SurrealConnection {
    client: Surreal<Any>,
    namespace: String,
    database: String,
}

impl SurrealConnection {
    /// Selected namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Selected database.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }
}

/// Graph adapter for SurrealDB.
#[derive(Default)]
pub struct SurrealDbAdapter {
    state: Arc<Mutex<Option<SurrealConnection>>>,
}

/// Awaits an SDK call.
///
/// SDK builders are `IntoFuture`; values that are already resolved can be
/// passed as `std::future::ready(..)`. Every call site goes through here.
async fn settle<F, T, E>(call: F) -> std::result::Result<T, E>
where
    F: IntoFuture<Output = std::result::Result<T, E>>,
{
    call.await
}

/// Strips a trailing `/rpc` (and any slashes after it) from a connection URI.
///
/// Anything else is passed through untouched, so embedded endpoints such as
/// `mem://` keep their scheme separator.
pub fn endpoint_address(uri: &str) -> &str {
    let trimmed = uri.trim();
    trimmed
        .trim_end_matches('/')
        .strip_suffix("/rpc")
        .unwrap_or(trimmed)
}

impl SurrealDbAdapter {
    /// Creates a disconnected adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace and database of the active connection.
    pub async fn scope(&self) -> Option<(String, String)> {
        self.state
            .lock()
            .await
            .as_ref()
            .map(|c| (c.namespace.clone(), c.database.clone()))
    }

    async fn connection(&self) -> Result<MappedMutexGuard<'_, SurrealConnection>> {
        MutexGuard::try_map(self.state.lock().await, Option::as_mut).map_err(|_| {
            Error::NotConnected {
                backend: BACKEND_NAME,
            }
        })
    }

    /// Runs one request and collects the outcome of each statement.
    async fn run(
        client: &Surreal<Any>,
        operation: &'static str,
        text: &str,
        parameters: Parameters,
    ) -> Result<QueryEnvelope> {
        let mut request = client.query(text);
        if !parameters.is_empty() {
            request = request.bind(parameters);
        }
        let mut response = settle(request)
            .await
            .map_err(|e| Error::query_failure(BACKEND_NAME, operation, e))?;

        let count = response.num_statements();
        let mut outcomes = Vec::with_capacity(count);
        for index in 0..count {
            let value: surrealdb::Value = response.take(index).map_err(|e| {
                Error::query_failure(BACKEND_NAME, format!("{operation} (statement {index})"), e)
            })?;
            outcomes.push(StatementOutcome::ok(value.into_inner().into_json()));
        }
        tracing::debug!(operation, statements = count, "surrealdb request completed");
        Ok(QueryEnvelope::new(outcomes))
    }

    async fn remove_tables(client: &Surreal<Any>, operation: &'static str) -> Result<()> {
        let statements = statements::remove_statements();
        Self::run(client, operation, &statements::batch(&statements), Parameters::new()).await?;
        tracing::info!(tables = statements.len(), "removed surrealdb tables");
        Ok(())
    }

    async fn read_episodes(
        &self,
        operation: &'static str,
        text: &str,
        parameters: Parameters,
    ) -> Result<Vec<Record>> {
        let connection = self.connection().await?;
        let envelope = Self::run(&connection.client, operation, text, parameters).await?;
        Ok(envelope
            .first_records()
            .into_iter()
            .map(|mut record| {
                normalize_record_id(&mut record, EPISODE_LABEL);
                record
            })
            .collect())
    }
}

#[async_trait]
impl GraphAdapter for SurrealDbAdapter {
    type Driver = Surreal<Any>;
    type Session = SurrealSession;
    type QueryResult = QueryEnvelope;

    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn is_connected(&self) -> bool {
        self.state.lock().await.is_some()
    }

    async fn connect(&self, options: &ConnectOptions) -> Result<()> {
        observe(BACKEND_NAME, "connect", async {
            let failure =
                |e: surrealdb::Error| Error::connection_failure(BACKEND_NAME, &options.uri, e);
            let address = endpoint_address(&options.uri);
            let namespace = options.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE);
            let database = options.database.as_deref().unwrap_or(DEFAULT_DATABASE);

            let client = settle(any::connect(address)).await.map_err(failure)?;
            if options.user.is_empty() {
                tracing::debug!("no user configured, skipping surrealdb signin");
            } else {
                settle(client.signin(Root {
                    username: &options.user,
                    password: options.password.expose_secret(),
                }))
                .await
                .map_err(failure)?;
            }
            settle(client.use_ns(namespace).use_db(database))
                .await
                .map_err(failure)?;
            settle(client.query(statements::PROBE))
                .await
                .and_then(surrealdb::Response::check)
                .map_err(failure)?;

            let connection = SurrealConnection {
                client,
                namespace: namespace.to_string(),
                database: database.to_string(),
            };
            if self.state.lock().await.replace(connection).is_some() {
                tracing::debug!("replaced existing surrealdb connection");
            }
            tracing::info!(
                uri = %options.uri,
                namespace,
                database,
                "connected to surrealdb"
            );
            Ok(())
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        if self.state.lock().await.take().is_some() {
            tracing::info!("closed surrealdb connection");
        }
        Ok(())
    }

    async fn get_driver(&self) -> Result<Surreal<Any>> {
        Ok(self.connection().await?.client.clone())
    }

    async fn get_session(&self) -> Result<SurrealSession> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        OwnedMutexGuard::try_map(guard, |state| state.as_mut().map(|c| &mut c.client)).map_err(
            |_| Error::NotConnected {
                backend: BACKEND_NAME,
            },
        )
    }

    async fn execute_query(&self, query: &str, parameters: Parameters) -> Result<QueryEnvelope> {
        observe(BACKEND_NAME, "execute_query", async {
            let connection = self.connection().await?;
            tracing::debug!(query, parameters = parameters.len(), "executing surrealql");
            Self::run(&connection.client, "execute_query", query, parameters).await
        })
        .await
    }

    async fn build_indices(&self, delete_existing: bool) -> Result<()> {
        observe(BACKEND_NAME, "build_indices", async {
            let connection = self.connection().await?;
            if delete_existing {
                Self::remove_tables(&connection.client, "build_indices").await?;
            }
            let statements = statements::schema_statements();
            Self::run(
                &connection.client,
                "build_indices",
                &statements::batch(&statements),
                Parameters::new(),
            )
            .await?;
            tracing::info!(statements = statements.len(), "provisioned surrealdb schema");
            Ok(())
        })
        .await
    }

    async fn clear_all_data(&self) -> Result<()> {
        observe(BACKEND_NAME, "clear_all_data", async {
            let connection = self.connection().await?;
            Self::remove_tables(&connection.client, "clear_all_data").await
        })
        .await
    }

    async fn get_episodes(&self) -> Result<Vec<Record>> {
        observe(
            BACKEND_NAME,
            "get_episodes",
            self.read_episodes("get_episodes", &statements::list_episodes(), Parameters::new()),
        )
        .await
    }

    async fn get_one_episode(&self, episode_id: &str) -> Result<Option<Record>> {
        let mut parameters = Parameters::new();
        parameters.insert("episode_id".to_string(), Value::String(episode_id.to_string()));
        observe(BACKEND_NAME, "get_one_episode", async {
            let records = self
                .read_episodes("get_one_episode", &statements::one_episode(), parameters)
                .await?;
            Ok(records.into_iter().next())
        })
        .await
    }
}

#[async_trait]
impl IntoRecords for QueryEnvelope {
    async fn into_records(self) -> Result<Vec<Record>> {
        Ok(self.rows())
    }
}
