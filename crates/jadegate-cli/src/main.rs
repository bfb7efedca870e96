//! JadeGate CLI — a thin client over `jadegate-config`, `jadegate-policy`,
//! `jadegate-trust`, and `jadegate-proxy`.
//!
//! This binary holds no security logic of its own: every subcommand below
//! is a direct call into one of those crates.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod commands;
mod theme;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jadegate_telemetry::LogConfig;

/// JadeGate — a local MCP tool-call security gateway.
#[derive(Parser)]
#[command(name = "jadegate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a `config.toml`, overriding the default
    /// `${HOME}/.jadegate/config.toml` lookup.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug-level logging, overriding the resolved config/env level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the stdio security proxy in front of an upstream MCP tool
    /// server.
    Proxy {
        /// The upstream tool server's own command.
        upstream_command: String,
        /// Arguments to pass through to the upstream command.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        upstream_args: Vec<String>,
    },
    /// Print a snapshot of the trust store and which policy checks are
    /// active.
    Status,
    /// View or initialize the security policy.
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },
    /// Certificate store operations.
    Cert {
        #[command(subcommand)]
        command: CertCommands,
    },
}

#[derive(Subcommand)]
enum PolicyCommands {
    /// Print the policy currently in effect, as JSON.
    Show,
    /// Write a fresh default policy to disk.
    Init {
        /// Output path. Defaults to the configured `policy_path`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CertCommands {
    /// List every certificate in the trust store.
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = jadegate_config::load(cli.config.as_deref())?;

    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    let log_config = LogConfig::new(level).with_format(config.log_format);
    if let Err(e) = jadegate_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Proxy {
            upstream_command,
            upstream_args,
        } => {
            commands::proxy::run(config, &upstream_command, &upstream_args).await?;
        }
        Commands::Status => {
            commands::status::run(&config)?;
        }
        Commands::Policy { command } => match command {
            PolicyCommands::Show => commands::policy::show(&config)?,
            PolicyCommands::Init { output } => commands::policy::init(&config, output.as_deref())?,
        },
        Commands::Cert { command } => match command {
            CertCommands::List => commands::cert::list(&config)?,
        },
    }

    Ok(())
}
