//! Config CLI command.

use super::write_line;
use crate::Result;
use crate::config::GraphDbConfig;
use crate::services::BackendFactory;
use std::io::Write;

/// Prints the resolved configuration and the supported database types.
pub fn cmd_config(config: &GraphDbConfig, out: &mut impl Write) -> Result<()> {
    write_line(out, format_args!("database: {}", config.redacted()))?;
    write_line(
        out,
        format_args!(
            "supported types: {}",
            BackendFactory::supported_types().join(", ")
        ),
    )?;
    match config.validate() {
        Ok(()) => write_line(out, "status: valid"),
        Err(e) => write_line(out, format_args!("status: {e}")),
    }
}
