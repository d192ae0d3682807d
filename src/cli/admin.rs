//! Connection and schema commands.

use super::write_line;
use crate::config::GraphDbConfig;
use crate::services::BackendFactory;
use crate::storage::GraphBackend;
use crate::{Error, Result};
use std::io::Write;

/// Validates `config`, builds its adapter, and connects it.
pub async fn connect(config: &GraphDbConfig) -> Result<Box<dyn GraphBackend>> {
    config.validate()?;
    let backend = BackendFactory::create_for(config.database_type)?;
    backend.connect(&config.connect_options()).await?;
    Ok(backend)
}

/// Reports a successful connection and closes it.
pub async fn cmd_ping(backend: &dyn GraphBackend, out: &mut impl Write) -> Result<()> {
    let connected = backend.is_connected().await;
    backend.close().await?;
    if connected {
        write_line(out, format_args!("{}: ok", backend.backend_name()))
    } else {
        Err(Error::NotConnected {
            backend: backend.backend_name(),
        })
    }
}

/// Provisions the schema.
///
/// With `destroy`, all data is deleted and existing schema dropped first.
pub async fn cmd_init(
    backend: &dyn GraphBackend,
    destroy: bool,
    out: &mut impl Write,
) -> Result<()> {
    if destroy {
        backend.clear_all_data().await?;
        write_line(out, "cleared all data")?;
    }
    backend.build_indices(destroy).await?;
    write_line(
        out,
        format_args!("{}: schema provisioned", backend.backend_name()),
    )
}

/// Deletes all data. Requires explicit confirmation.
pub async fn cmd_clear(
    backend: &dyn GraphBackend,
    confirmed: bool,
    out: &mut impl Write,
) -> Result<()> {
    if !confirmed {
        return Err(Error::InvalidInput(
            "refusing to delete all data without --yes".to_string(),
        ));
    }
    backend.clear_all_data().await?;
    write_line(
        out,
        format_args!("{}: all data cleared", backend.backend_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Parameters;
    use crate::storage::ConnectOptions;
    use crate::storage::testing::StubAdapter;
    use serde_json::json;

    async fn connected() -> Box<dyn GraphBackend> {
        let backend: Box<dyn GraphBackend> = Box::new(StubAdapter::default());
        backend
            .connect(&ConnectOptions::new("stub://", "", ""))
            .await
            .expect("connect");
        backend
    }

    #[tokio::test]
    async fn test_ping_closes() {
        let backend = connected().await;
        let mut out = Vec::new();
        cmd_ping(backend.as_ref(), &mut out).await.expect("ping");
        assert_eq!(String::from_utf8(out).expect("utf8"), "stub: ok\n");
        assert!(!backend.is_connected().await);
    }

    #[tokio::test]
    async fn test_init_with_destroy_clears_data() {
        let backend = connected().await;
        let mut episode = Parameters::new();
        episode.insert("id".to_string(), json!("ep-1"));
        backend.execute_query("CREATE", episode).await.expect("create");

        let mut out = Vec::new();
        cmd_init(backend.as_ref(), true, &mut out).await.expect("init");
        assert!(backend.get_episodes().await.expect("episodes").is_empty());
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("cleared all data\n"));
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let backend = connected().await;
        let mut out = Vec::new();
        let err = cmd_clear(backend.as_ref(), false, &mut out)
            .await
            .expect_err("unconfirmed");
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(out.is_empty());

        cmd_clear(backend.as_ref(), true, &mut out).await.expect("clear");
        assert_eq!(String::from_utf8(out).expect("utf8"), "stub: all data cleared\n");
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let mut config = GraphDbConfig::default();
        config.uri = String::new();
        let err = connect(&config).await.err().expect("invalid config");
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
