//! Object-safe view of an adapter.
//!
//! [`GraphAdapter`] has associated types, so it cannot be used as a trait
//! object. [`GraphBackend`] erases them: `execute_query` materializes the native
//! result into records. Every `GraphAdapter` whose result implements
//! [`IntoRecords`] is a `GraphBackend` through a blanket impl, which is what
//! the factory hands out.
//!
//! Native handles stay reachable by downcasting:
//!
//! ```rust,ignore
//! let backend = BackendFactory::create("neo4j")?;
//! if let Some(neo4j) = backend.as_any().downcast_ref::<Neo4jAdapter>() {
//!     let graph = neo4j.get_driver().await?;
//! }
//! ```

use super::adapter::{ConnectOptions, GraphAdapter};
use crate::Result;
use crate::models::{Parameters, Record};
use async_trait::async_trait;
use std::any::Any;

/// Native query results that can be consumed into records.
#[async_trait]
pub trait IntoRecords: Send {
    /// Consumes the result, returning one record per row.
    async fn into_records(self) -> Result<Vec<Record>>;
}

#[async_trait]
impl IntoRecords for Vec<Record> {
    async fn into_records(self) -> Result<Vec<Record>> {
        Ok(self)
    }
}

/// Type-erased adapter contract, as returned by the factory.
///
/// Bring only one of `GraphAdapter` or `GraphBackend` into scope when calling
/// methods on a concrete adapter, since both name the same operations.
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Registered tag of this backend.
    fn backend_name(&self) -> &'static str;

    /// Returns true while connected.
    async fn is_connected(&self) -> bool;

    /// See [`GraphAdapter::connect`].
    async fn connect(&self, options: &ConnectOptions) -> Result<()>;

    /// See [`GraphAdapter::close`].
    async fn close(&self) -> Result<()>;

    /// Executes a query and materializes its rows.
    async fn execute_query(&self, query: &str, parameters: Parameters) -> Result<Vec<Record>>;

    /// See [`GraphAdapter::build_indices`].
    async fn build_indices(&self, delete_existing: bool) -> Result<()>;

    /// See [`GraphAdapter::clear_all_data`].
    async fn clear_all_data(&self) -> Result<()>;

    /// See [`GraphAdapter::get_episodes`].
    async fn get_episodes(&self) -> Result<Vec<Record>>;

    /// See [`GraphAdapter::get_one_episode`].
    async fn get_one_episode(&self, episode_id: &str) -> Result<Option<Record>>;

    /// Returns `self` for downcasting to the concrete adapter.
    fn as_any(&self) -> &dyn Any;
}

#[async_trait]
impl<A> GraphBackend for A
where
    A: GraphAdapter,
    A::QueryResult: IntoRecords,
{
    fn backend_name(&self) -> &'static str {
        GraphAdapter::backend_name(self)
    }

    async fn is_connected(&self) -> bool {
        GraphAdapter::is_connected(self).await
    }

    async fn connect(&self, options: &ConnectOptions) -> Result<()> {
        GraphAdapter::connect(self, options).await
    }

    async fn close(&self) -> Result<()> {
        GraphAdapter::close(self).await
    }

    async fn execute_query(&self, query: &str, parameters: Parameters) -> Result<Vec<Record>> {
        GraphAdapter::execute_query(self, query, parameters)
            .await?
            .into_records()
            .await
    }

    async fn build_indices(&self, delete_existing: bool) -> Result<()> {
        GraphAdapter::build_indices(self, delete_existing).await
    }

    async fn clear_all_data(&self) -> Result<()> {
        GraphAdapter::clear_all_data(self).await
    }

    async fn get_episodes(&self) -> Result<Vec<Record>> {
        GraphAdapter::get_episodes(self).await
    }

    async fn get_one_episode(&self, episode_id: &str) -> Result<Option<Record>> {
        GraphAdapter::get_one_episode(self, episode_id).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
