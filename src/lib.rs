//! # graphdb
//!
//! Backend-agnostic graph storage adapter for knowledge-graph applications.
//!
//! A single async contract covers connection management, query execution,
//! schema provisioning, and data lifecycle, while the storage engine stays
//! swappable behind a factory.
//!
//! ## Features
//!
//! - [`GraphAdapter`] trait with backend-native driver, session and result types
//! - Neo4j backend over Bolt (`neo4j` feature)
//! - SurrealDB backend with a single guarded client (`surrealdb` feature)
//! - Registration-table factory keyed by a case-insensitive database-type tag
//!
//! ## Example
//!
//! ```rust,ignore
//! use graphdb::{BackendFactory, GraphDbConfig};
//!
//! let config = GraphDbConfig::from_env()?;
//! let adapter = BackendFactory::create(config.database_type.as_str())?;
//! adapter.connect(&config.connect_options()).await?;
//! adapter.build_indices(false).await?;
//! let episodes = adapter.get_episodes().await?;
//! adapter.close().await?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::GraphDbConfig;
pub use models::{DatabaseType, Parameters, Record};
pub use services::{AdapterDescriptor, BackendFactory, BackendRegistry};
pub use storage::{ConnectOptions, GraphAdapter, GraphBackend, IntoRecords};

/// Boxed native driver error kept as the `source` of an [`Error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for graph adapter operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotConnected` | A data operation is issued before `connect` or after `close` |
/// | `ConnectionFailure` | Authentication, namespace selection, or the reachability probe fails |
/// | `QueryExecutionFailure` | The backend rejects or fails a statement |
/// | `UnsupportedBackend` | A database-type tag is not registered |
/// | `InvalidInput` | Configuration is incomplete or malformed |
/// | `OperationFailed` | Local I/O fails (config file, log file, subscriber init) |
#[derive(Debug, ThisError)]
pub enum Error {
    /// No active connection.
    ///
    /// The adapter never connects lazily; call `connect` first.
    #[error("not connected to {backend}")]
    NotConnected {
        /// Backend that was asked to do the work.
        backend: &'static str,
    },

    /// Connecting or verifying the connection failed.
    ///
    /// The adapter stays disconnected and can be connected again.
    #[error("failed to connect to {backend} at {uri}: {source}")]
    ConnectionFailure {
        /// Backend being connected.
        backend: &'static str,
        /// Target URI.
        uri: String,
        /// Native driver error.
        #[source]
        source: BoxError,
    },

    /// A query failed to execute.
    ///
    /// The connection itself stays usable.
    #[error("{backend} operation '{operation}' failed: {source}")]
    QueryExecutionFailure {
        /// Backend that executed the query.
        backend: &'static str,
        /// Adapter operation that issued the query.
        operation: String,
        /// Native driver error.
        #[source]
        source: BoxError,
    },

    /// The database-type tag is not registered with the factory.
    #[error("unsupported database type: {0}")]
    UnsupportedBackend(String),

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A local operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds a [`Error::ConnectionFailure`] from a native error.
    pub fn connection_failure<E>(backend: &'static str, uri: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::ConnectionFailure {
            backend,
            uri: uri.into(),
            source: source.into(),
        }
    }

    /// Builds a [`Error::QueryExecutionFailure`] from a native error.
    pub fn query_failure<E>(backend: &'static str, operation: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::QueryExecutionFailure {
            backend,
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// Returns the native driver error, if it has type `E`.
    ///
    /// ```rust,ignore
    /// if let Some(bolt) = err.native::<neo4rs::Error>() {
    ///     tracing::warn!(?bolt, "bolt failure");
    /// }
    /// ```
    #[must_use]
    pub fn native<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::ConnectionFailure { source, .. } | Self::QueryExecutionFailure { source, .. } => {
                source.downcast_ref::<E>()
            },
            _ => None,
        }
    }

    /// Returns true for [`Error::NotConnected`].
    #[must_use]
    pub const fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected { .. })
    }
}

/// Result type alias for graph adapter operations.
pub type Result<T> = std::result::Result<T, Error>;
