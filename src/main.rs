//! Binary entry point for graphdb.
//!
//! Thin dispatcher over the library's CLI commands.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use graphdb::GraphDbConfig;
use graphdb::cli;
use graphdb::observability::{self, LogFormat, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// graphdb - backend-agnostic graph storage administration.
#[derive(Parser)]
#[command(name = "graphdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "GRAPHDB_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Log format: pretty or json.
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Show the resolved configuration.
    Config,

    /// Connect, verify, and disconnect.
    Ping,

    /// Provision constraints and indexes.
    Init {
        /// Delete all data and drop existing schema first.
        #[arg(long)]
        destroy: bool,
    },

    /// List all episodes, newest first.
    Episodes,

    /// Show one episode.
    Episode {
        /// Episode id.
        id: String,
    },

    /// Delete all data.
    Clear {
        /// Confirm deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Run a native query.
    Query {
        /// Query text (Cypher or SurrealQL).
        text: String,

        /// Parameter as key=value; the value is parsed as JSON when possible.
        #[arg(short, long = "param")]
        params: Vec<String>,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env(cli.verbose);
    if let Some(format) = cli.log_format {
        logging = logging.with_format(format);
    }
    if let Err(e) = observability::init_logging(&logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    let mut out = std::io::stdout();

    if matches!(cli.command, Commands::Config) {
        cli::cmd_config(&config, &mut out)?;
        return Ok(ExitCode::SUCCESS);
    }

    let backend = cli::connect(&config)
        .await
        .with_context(|| format!("connecting to {}", config.database_type))?;

    let result = match cli.command {
        Commands::Config => Ok(ExitCode::SUCCESS),
        Commands::Ping => cli::cmd_ping(backend.as_ref(), &mut out)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Init { destroy } => cli::cmd_init(backend.as_ref(), destroy, &mut out)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Episodes => cli::cmd_episodes(backend.as_ref(), &mut out)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Episode { id } => cli::cmd_episode(backend.as_ref(), &id, &mut out)
            .await
            .map(|found| if found { ExitCode::SUCCESS } else { ExitCode::FAILURE }),
        Commands::Clear { yes } => cli::cmd_clear(backend.as_ref(), yes, &mut out)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Query { text, params } => {
            cli::cmd_query(backend.as_ref(), &text, &params, &mut out)
                .await
                .map(|_| ExitCode::SUCCESS)
        },
    };

    backend.close().await.context("closing connection")?;
    Ok(result?)
}

/// Loads configuration from an explicit file, the default file, or the
/// environment.
fn load_config(path: Option<&std::path::Path>) -> Result<GraphDbConfig> {
    if let Some(config_path) = path {
        return GraphDbConfig::load_from_file(config_path)
            .with_context(|| format!("loading {}", config_path.display()));
    }
    GraphDbConfig::load_default().context("resolving configuration")
}
