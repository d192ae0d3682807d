//! Neo4j backend over Bolt.
//!
//! Uses `neo4rs` for async, pooled Bolt connections. The adapter holds one
//! [`Graph`] pool; every operation checks out its own pooled connection in an
//! explicit transaction, so concurrent calls never share a session. Each
//! statement is sent once: transient server errors surface to the caller
//! instead of being retried.
//!
//! # Usage
//!
//! ```rust,ignore
//! use graphdb::storage::{ConnectOptions, GraphAdapter, Neo4jAdapter};
//!
//! let adapter = Neo4jAdapter::new();
//! adapter
//!     .connect(&ConnectOptions::new("bolt://localhost:7687", "neo4j", "password"))
//!     .await?;
//! adapter.build_indices(false).await?;
//!
//! let rows = adapter.execute_query("MATCH (n) RETURN count(n) AS n", Parameters::new()).await?;
//! for row in rows {
//!     let n: i64 = row.get("n")?;
//! }
//! ```

mod convert;
mod rows;
pub mod statements;

pub use convert::{json_to_bolt, node_to_record};
pub use rows::Neo4jRows;

use super::instrument::observe;
use super::traits::{ConnectOptions, GraphAdapter, IntoRecords};
use crate::models::{Parameters, Record};
use crate::{Error, Result};
use async_trait::async_trait;
use neo4rs::{Graph, Node, Query, Txn, query};
use secrecy::ExposeSecret;
use statements::{SchemaStatement, StatementKind};
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Registered backend tag.
pub const BACKEND_NAME: &str = "neo4j";

/// Status code Community Edition returns for property existence constraints.
const CONSTRAINT_CREATION_FAILED: &str = "Neo.DatabaseError.Schema.ConstraintCreationFailed";

/// Graph adapter for Neo4j.
#[derive(Default)]
pub struct Neo4jAdapter {
    graph: RwLock<Option<Graph>>,
}

impl Neo4jAdapter {
    /// Creates a disconnected adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn graph(&self) -> Result<Graph> {
        self.graph.read().await.clone().ok_or(Error::NotConnected {
            backend: BACKEND_NAME,
        })
    }

    async fn begin(graph: &Graph, operation: &'static str) -> neo4rs::Result<Txn> {
        let txn = graph.start_txn().await?;
        tracing::trace!(operation, "started neo4j transaction");
        Ok(txn)
    }

    /// Runs one statement in its own transaction and commits it.
    async fn write(graph: &Graph, statement: Query) -> neo4rs::Result<()> {
        let mut txn = Self::begin(graph, "write").await?;
        txn.run(statement).await?;
        txn.commit().await
    }

    /// Runs one statement in its own transaction, drains it, and commits.
    async fn fetch(graph: &Graph, statement: Query) -> neo4rs::Result<Neo4jRows> {
        let mut txn = Self::begin(graph, "fetch").await?;
        let mut stream = txn.execute(statement).await?;
        let mut rows = VecDeque::new();
        while let Some(row) = stream.next(txn.handle()).await? {
            rows.push_back(row);
        }
        txn.commit().await?;
        Ok(Neo4jRows::new(rows))
    }

    async fn names(graph: &Graph, cypher: &str) -> Result<Vec<String>> {
        Self::fetch(graph, query(cypher))
            .await
            .map_err(|e| Error::query_failure(BACKEND_NAME, "build_indices", e))?
            .map(|row| {
                row.get::<String>("name")
                    .map_err(|e| Error::query_failure(BACKEND_NAME, "build_indices", e))
            })
            .collect()
    }

    async fn drop_all(graph: &Graph, statements: impl IntoIterator<Item = String>) -> Result<()> {
        for cypher in statements {
            Self::write(graph, query(&cypher))
                .await
                .map_err(|e| Error::query_failure(BACKEND_NAME, "build_indices", e))?;
        }
        Ok(())
    }

    /// Drops every constraint, then every remaining droppable index.
    async fn reset_schema(graph: &Graph) -> Result<()> {
        let constraints = Self::names(graph, statements::SHOW_CONSTRAINTS).await?;
        Self::drop_all(graph, constraints.iter().map(String::as_str).map(statements::drop_constraint)).await?;

        // Constraint-backed indexes are gone now.
        let indexes = Self::names(graph, statements::SHOW_INDEXES).await?;
        Self::drop_all(graph, indexes.iter().map(String::as_str).map(statements::drop_index)).await?;

        tracing::info!(
            constraints = constraints.len(),
            indexes = indexes.len(),
            "dropped existing neo4j schema"
        );
        Ok(())
    }

    async fn provision(graph: &Graph, statement: &SchemaStatement) -> Result<()> {
        match Self::write(graph, query(&statement.cypher)).await {
            Ok(()) => Ok(()),
            Err(e) if statement.kind == StatementKind::NotNull && requires_enterprise(&e) => {
                tracing::warn!(
                    target_field = %statement.target,
                    "existence constraints need Neo4j Enterprise Edition, skipping"
                );
                Ok(())
            },
            Err(e) => Err(Error::query_failure(BACKEND_NAME, "build_indices", e)),
        }
    }

    async fn read_nodes(
        &self,
        operation: &'static str,
        statement: Query,
    ) -> Result<Vec<Record>> {
        let graph = self.graph().await?;
        Self::fetch(&graph, statement)
            .await
            .map_err(|e| Error::query_failure(BACKEND_NAME, operation, e))?
            .map(|row| {
                row.get::<Node>("e")
                    .map(|node| node_to_record(&node))
                    .map_err(|e| Error::query_failure(BACKEND_NAME, operation, e))
            })
            .collect()
    }
}

/// Community Edition rejects property existence constraints.
fn requires_enterprise(error: &neo4rs::Error) -> bool {
    match error {
        neo4rs::Error::Neo4j(e) => is_edition_restriction(e.code(), e.message()),
        _ => false,
    }
}

fn is_edition_restriction(code: &str, message: &str) -> bool {
    code == CONSTRAINT_CREATION_FAILED && message.contains("Enterprise Edition")
}

#[async_trait]
impl GraphAdapter for Neo4jAdapter {
    type Driver = Graph;
    type Session = Txn;
    type QueryResult = Neo4jRows;

    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn is_connected(&self) -> bool {
        self.graph.read().await.is_some()
    }

    async fn connect(&self, options: &ConnectOptions) -> Result<()> {
        observe(BACKEND_NAME, "connect", async {
            let failure = |e| Error::connection_failure(BACKEND_NAME, &options.uri, e);
            let graph = Graph::new(
                options.uri.as_str(),
                options.user.as_str(),
                options.password.expose_secret(),
            )
            .await
            .map_err(failure)?;

            Self::fetch(&graph, query(statements::PROBE))
                .await
                .map_err(failure)?;

            if self.graph.write().await.replace(graph).is_some() {
                tracing::debug!("replaced existing neo4j connection");
            }
            tracing::info!(uri = %options.uri, user = %options.user, "connected to neo4j");
            Ok(())
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        if self.graph.write().await.take().is_some() {
            tracing::info!("closed neo4j connection");
        }
        Ok(())
    }

    async fn get_driver(&self) -> Result<Graph> {
        self.graph().await
    }

    async fn get_session(&self) -> Result<Txn> {
        let graph = self.graph().await?;
        Self::begin(&graph, "get_session")
            .await
            .map_err(|e| Error::query_failure(BACKEND_NAME, "get_session", e))
    }

    async fn execute_query(&self, cypher: &str, parameters: Parameters) -> Result<Neo4jRows> {
        observe(BACKEND_NAME, "execute_query", async {
            let graph = self.graph().await?;
            tracing::debug!(query = cypher, parameters = parameters.len(), "executing cypher");
            Self::fetch(&graph, convert::bind(query(cypher), parameters))
                .await
                .map_err(|e| Error::query_failure(BACKEND_NAME, "execute_query", e))
        })
        .await
    }

    async fn build_indices(&self, delete_existing: bool) -> Result<()> {
        observe(BACKEND_NAME, "build_indices", async {
            let graph = self.graph().await?;
            if delete_existing {
                Self::reset_schema(&graph).await?;
            }

            let statements = statements::schema_statements();
            for statement in &statements {
                Self::provision(&graph, statement).await?;
            }
            tracing::info!(statements = statements.len(), "provisioned neo4j schema");
            Ok(())
        })
        .await
    }

    async fn clear_all_data(&self) -> Result<()> {
        observe(BACKEND_NAME, "clear_all_data", async {
            let graph = self.graph().await?;
            Self::write(&graph, query(statements::CLEAR_ALL))
                .await
                .map_err(|e| Error::query_failure(BACKEND_NAME, "clear_all_data", e))?;
            tracing::info!("cleared all neo4j data");
            Ok(())
        })
        .await
    }

    async fn get_episodes(&self) -> Result<Vec<Record>> {
        observe(
            BACKEND_NAME,
            "get_episodes",
            self.read_nodes("get_episodes", query(&statements::list_episodes())),
        )
        .await
    }

    async fn get_one_episode(&self, episode_id: &str) -> Result<Option<Record>> {
        let statement = query(&statements::one_episode()).param("episode_id", episode_id);
        observe(BACKEND_NAME, "get_one_episode", async {
            Ok(self
                .read_nodes("get_one_episode", statement)
                .await?
                .into_iter()
                .next())
        })
        .await
    }
}

#[async_trait]
impl IntoRecords for Neo4jRows {
    async fn into_records(self) -> Result<Vec<Record>> {
        self.map(|row| {
            row.to::<Record>()
                .map_err(|e| Error::query_failure(BACKEND_NAME, "execute_query", e))
        })
        .collect()
    }
}
