//! Storage layer.
//!
//! This module holds the adapter contract and its backends:
//! - **Contract**: [`GraphAdapter`] with native handle types, and its
//!   object-safe view [`GraphBackend`]
//! - **Neo4j**: Bolt property graph (`neo4j` feature)
//! - **SurrealDB**: multi-model store behind one guarded client (`surrealdb` feature)

// Allow significant_drop_tightening - the connection guard is held for the
// whole round trip on purpose.
#![allow(clippy::significant_drop_tightening)]
// Allow cast precision loss for millisecond durations.
#![allow(clippy::cast_precision_loss)]

pub(crate) mod instrument;
pub mod traits;

#[cfg(feature = "neo4j")]
pub mod neo4j;
#[cfg(feature = "surrealdb")]
pub mod surrealdb;

#[cfg(test)]
pub(crate) mod testing;

pub use traits::{ConnectOptions, GraphAdapter, GraphBackend, IntoRecords};

#[cfg(feature = "neo4j")]
pub use neo4j::{Neo4jAdapter, Neo4jRows};
#[cfg(feature = "surrealdb")]
pub use self::surrealdb::{QueryEnvelope, StatementOutcome, SurrealDbAdapter};
