//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_core::db::DEFAULT_DB_PATH;

/// Tally - Record and query personal transactions through agent tools
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal finance transaction store for agent tool calls", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, env = "TALLY_DB", default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database (safe to run repeatedly)
    Init,

    /// Serve the tools over MCP on stdin/stdout
    Mcp,

    /// Print the tool catalog as JSON
    Tools,

    /// Run one tool and print its JSON result
    Call {
        /// Tool name, e.g. get_monthly_spending
        tool: String,

        /// Tool arguments as a JSON object (defaults to {})
        args: Option<String>,
    },
}
