//! CLI command implementations.
//!
//! Each command writes to a caller-supplied writer so the binary stays a thin
//! dispatcher.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `config` | Show the resolved configuration (password masked) |
//! | `ping` | Connect, verify, and disconnect |
//! | `init` | Provision schema, optionally wiping data and schema first |
//! | `episodes` | List episodes as JSON lines, newest first |
//! | `episode` | Show one episode |
//! | `clear` | Delete all data |
//! | `query` | Run a native query with JSON parameters |
//!
//! # Example Usage
//!
//! ```bash
//! DATABASE_TYPE=surrealdb graphdb init
//! graphdb query "MATCH (e:Episode) RETURN e.id AS id" --param limit=10
//! graphdb episode ep-1
//! ```

mod admin;
mod config;
mod episodes;
mod query;

pub use admin::{cmd_clear, cmd_init, cmd_ping, connect};
pub use config::cmd_config;
pub use episodes::{cmd_episode, cmd_episodes};
pub use query::{cmd_query, parse_param};

use crate::{Error, Result};
use std::io::Write;

fn write_line(out: &mut impl Write, line: impl std::fmt::Display) -> Result<()> {
    writeln!(out, "{line}").map_err(|e| Error::OperationFailed {
        operation: "write_output".to_string(),
        cause: e.to_string(),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::OperationFailed {
        operation: "serialize_output".to_string(),
        cause: e.to_string(),
    })
}
