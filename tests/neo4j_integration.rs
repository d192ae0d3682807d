//! Neo4j Integration Tests
//!
//! Runs the adapter contract against a live Neo4j server. Set the environment
//! variable `GRAPHDB_TEST_NEO4J_URI` to enable these tests:
//!
//! ```bash
//! export GRAPHDB_TEST_NEO4J_URI="bolt://localhost:7687"
//! export GRAPHDB_TEST_NEO4J_PASSWORD="password"
//! cargo test --features neo4j neo4j_integration
//! ```
//!
//! The database is wiped by these tests.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::doc_markdown
)]
#![cfg(feature = "neo4j")]

use graphdb::storage::{ConnectOptions, GraphAdapter, Neo4jAdapter};
use graphdb::{BackendFactory, Error, Parameters};
use serde_json::json;
use std::env;

/// Environment variable for the Neo4j test URI.
const NEO4J_URI_ENV: &str = "GRAPHDB_TEST_NEO4J_URI";

fn connect_options() -> Option<ConnectOptions> {
    let uri = env::var(NEO4J_URI_ENV).ok()?;
    let user = env::var("GRAPHDB_TEST_NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string());
    let password =
        env::var("GRAPHDB_TEST_NEO4J_PASSWORD").unwrap_or_else(|_| "password".to_string());
    Some(ConnectOptions::new(uri, user, password))
}

/// Macro to skip tests when Neo4j is not available.
macro_rules! require_neo4j {
    () => {
        match connect_options() {
            Some(options) => options,
            None => {
                eprintln!(
                    "Skipping test: {} not set. Set this environment variable to run Neo4j tests.",
                    NEO4J_URI_ENV
                );
                return;
            },
        }
    };
}

const CREATE_EPISODE: &str = "CREATE (e:Episode {id: $id, created_at: datetime($created_at), \
                              title: $title, summary: $summary})";

fn episode(id: &str, created_at: &str) -> Parameters {
    let mut params = Parameters::new();
    params.insert("id".to_string(), json!(id));
    params.insert("created_at".to_string(), json!(created_at));
    params.insert("title".to_string(), json!(format!("Episode {id}")));
    params.insert("summary".to_string(), json!("integration test"));
    params
}

/// Everything shares one database, so the scenario runs in one test.
#[tokio::test]
async fn test_neo4j_lifecycle() {
    let options = require_neo4j!();
    let backend = BackendFactory::create("Neo4j").expect("factory");

    backend.connect(&options).await.expect("connect");
    assert!(backend.is_connected().await);

    let probe = backend
        .execute_query("RETURN 1 AS one", Parameters::new())
        .await
        .expect("probe");
    assert_eq!(probe[0]["one"], json!(1));

    backend.clear_all_data().await.expect("clear");
    backend.build_indices(true).await.expect("reset schema");
    backend.build_indices(false).await.expect("first build");
    backend.build_indices(false).await.expect("second build is idempotent");

    backend
        .execute_query(CREATE_EPISODE, episode("ep-1", "2024-01-01T00:00:00Z"))
        .await
        .expect("create ep-1");

    let found = backend
        .get_one_episode("ep-1")
        .await
        .expect("lookup")
        .expect("ep-1 exists");
    assert_eq!(found["id"], json!("ep-1"));
    assert_eq!(found["created_at"], json!("2024-01-01T00:00:00Z"));
    assert_eq!(found["title"], json!("Episode ep-1"));
    assert_eq!(found["summary"], json!("integration test"));
    assert_eq!(found.len(), 4);

    let duplicate = backend
        .execute_query(CREATE_EPISODE, episode("ep-1", "2024-01-02T00:00:00Z"))
        .await
        .expect_err("uniqueness constraint");
    assert!(matches!(duplicate, Error::QueryExecutionFailure { .. }));
    assert!(duplicate.native::<neo4rs::Error>().is_some());
    assert!(backend.is_connected().await, "query failure keeps the connection");

    for (id, at) in [("ep-3", "2024-03-01T00:00:00Z"), ("ep-2", "2024-02-01T00:00:00Z")] {
        backend
            .execute_query(CREATE_EPISODE, episode(id, at))
            .await
            .expect("create");
    }
    let ids: Vec<_> = backend
        .get_episodes()
        .await
        .expect("episodes")
        .into_iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("ep-3"), json!("ep-2"), json!("ep-1")]);

    assert!(
        backend
            .get_one_episode("does-not-exist")
            .await
            .expect("lookup")
            .is_none()
    );

    backend.clear_all_data().await.expect("clear");
    assert!(backend.get_episodes().await.expect("episodes").is_empty());

    backend.close().await.expect("close");
    backend.close().await.expect("close is idempotent");
    assert!(backend.get_episodes().await.expect_err("closed").is_not_connected());
}

#[tokio::test]
async fn test_neo4j_native_handles() {
    let options = require_neo4j!();
    let adapter = Neo4jAdapter::new();
    adapter.connect(&options).await.expect("connect");

    let rows = adapter
        .execute_query("UNWIND [1, 2, 3] AS n RETURN n", Parameters::new())
        .await
        .expect("query");
    assert_eq!(rows.len(), 3);
    let seen: Vec<i64> = rows.map(|row| row.get("n").expect("n")).collect();
    assert_eq!(seen, vec![1, 2, 3]);

    adapter
        .execute_query("CREATE (:Episode {id: 'committed', created_at: datetime()})", Parameters::new())
        .await
        .expect("write");
    assert!(
        adapter.get_one_episode("committed").await.expect("lookup").is_some(),
        "writes through execute_query are committed"
    );
    adapter.clear_all_data().await.expect("clear");

    let graph = adapter.get_driver().await.expect("driver");
    graph.run(neo4rs::query("RETURN 1")).await.expect("driver usable");

    let mut txn = adapter.get_session().await.expect("session");
    txn.run(neo4rs::query("RETURN 1")).await.expect("txn run");
    txn.rollback().await.expect("rollback");

    adapter.close().await.expect("close");
}

#[tokio::test]
async fn test_neo4j_bad_credentials() {
    let options = require_neo4j!();
    let adapter = Neo4jAdapter::new();
    let wrong = ConnectOptions::new(options.uri.clone(), options.user.clone(), "definitely-wrong");

    let err = adapter.connect(&wrong).await.expect_err("auth rejected");
    assert!(matches!(err, Error::ConnectionFailure { backend: "neo4j", .. }));
    assert!(!adapter.is_connected().await);

    adapter.connect(&options).await.expect("reconnect after failure");
    adapter.close().await.expect("close");
}
