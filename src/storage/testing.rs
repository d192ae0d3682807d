//! In-process adapter used by contract tests.

use super::traits::{ConnectOptions, GraphAdapter};
use crate::models::{Parameters, Record};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

pub(crate) const STUB_BACKEND: &str = "stub";

/// Keeps episodes in memory; `execute_query("CREATE", params)` stores `params`.
#[derive(Default)]
pub(crate) struct StubAdapter {
    episodes: Mutex<Option<Vec<Record>>>,
}

impl StubAdapter {
    async fn with_episodes<T>(&self, f: impl FnOnce(&mut Vec<Record>) -> T) -> Result<T> {
        let mut guard = self.episodes.lock().await;
        let episodes = guard.as_mut().ok_or(Error::NotConnected {
            backend: STUB_BACKEND,
        })?;
        Ok(f(episodes))
    }
}

#[async_trait]
impl GraphAdapter for StubAdapter {
    type Driver = ();
    type Session = ();
    type QueryResult = Vec<Record>;

    fn backend_name(&self) -> &'static str {
        STUB_BACKEND
    }

    async fn is_connected(&self) -> bool {
        self.episodes.lock().await.is_some()
    }

    async fn connect(&self, options: &ConnectOptions) -> Result<()> {
        if options.uri.is_empty() {
            return Err(Error::connection_failure(STUB_BACKEND, "", "empty uri"));
        }
        self.episodes.lock().await.get_or_insert_with(Vec::new);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.episodes.lock().await.take();
        Ok(())
    }

    async fn get_driver(&self) -> Result<()> {
        self.with_episodes(|_| ()).await
    }

    async fn get_session(&self) -> Result<()> {
        self.with_episodes(|_| ()).await
    }

    async fn execute_query(&self, query: &str, parameters: Parameters) -> Result<Vec<Record>> {
        let query = query.to_string();
        self.with_episodes(|episodes| match query.as_str() {
            "CREATE" => {
                episodes.push(parameters.clone());
                Ok(vec![parameters])
            },
            "RETURN 1" => {
                let mut row = Record::new();
                row.insert("1".to_string(), Value::from(1));
                Ok(vec![row])
            },
            other => Err(Error::query_failure(
                STUB_BACKEND,
                "execute_query",
                format!("unknown statement: {other}"),
            )),
        })
        .await?
    }

    async fn build_indices(&self, _delete_existing: bool) -> Result<()> {
        self.with_episodes(|_| ()).await
    }

    async fn clear_all_data(&self) -> Result<()> {
        self.with_episodes(Vec::clear).await
    }

    async fn get_episodes(&self) -> Result<Vec<Record>> {
        self.with_episodes(|episodes| {
            let mut sorted = episodes.clone();
            sorted.sort_by(|a, b| {
                let key = |r: &Record| r.get("created_at").and_then(Value::as_str).map(str::to_string);
                key(b).cmp(&key(a))
            });
            sorted
        })
        .await
    }

    async fn get_one_episode(&self, episode_id: &str) -> Result<Option<Record>> {
        self.with_episodes(|episodes| {
            episodes
                .iter()
                .find(|r| r.get("id").and_then(Value::as_str) == Some(episode_id))
                .cloned()
        })
        .await
    }
}
