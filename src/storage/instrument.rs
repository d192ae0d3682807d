//! Per-operation logging and metrics.

use crate::Result;
use std::future::Future;
use std::time::Instant;

/// Runs one adapter operation, recording its outcome and duration.
///
/// Emits `graphdb_operations_total{backend, operation, status}` and
/// `graphdb_operation_duration_ms{backend, operation}`. The error is returned
/// unchanged.
pub(crate) async fn observe<T, F>(backend: &'static str, operation: &'static str, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let result = work.await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let status = if result.is_ok() { "success" } else { "error" };

    metrics::counter!(
        "graphdb_operations_total",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "graphdb_operation_duration_ms",
        "backend" => backend,
        "operation" => operation
    )
    .record(elapsed_ms);

    match &result {
        Ok(_) => tracing::debug!(backend, operation, elapsed_ms, "graph operation completed"),
        Err(e) => tracing::warn!(backend, operation, elapsed_ms, error = %e, "graph operation failed"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_observe_passes_value_through() {
        let value = observe("neo4j", "get_episodes", async { Ok(7) }).await;
        assert_eq!(value.ok(), Some(7));
    }

    #[tokio::test]
    async fn test_observe_passes_error_through() {
        let result: Result<()> = observe("neo4j", "clear_all_data", async {
            Err(Error::NotConnected { backend: "neo4j" })
        })
        .await;
        assert!(matches!(result, Err(Error::NotConnected { backend: "neo4j" })));
    }
}
