//! Tally CLI - Transaction store for agent tool calls
//!
//! Usage:
//!   tally init                         Initialize database
//!   tally mcp                          Serve tools over MCP (stdio)
//!   tally tools                        Print the tool catalog
//!   tally call TOOL '{"arg": ...}'     Run one tool

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries MCP traffic and command output, so logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Mcp => commands::cmd_mcp(&cli.db).await,
        Commands::Tools => commands::cmd_tools(),
        Commands::Call { tool, args } => commands::cmd_call(&cli.db, &tool, args.as_deref()),
    }
}
