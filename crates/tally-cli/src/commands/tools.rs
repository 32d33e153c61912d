//! Tool catalog and one-shot tool calls

use std::path::Path;

use anyhow::{bail, Context, Result};
use tally_core::db::Database;
use tally_core::{execute_tool, tally_tools};
use tracing::debug;

use super::open_db;

pub fn cmd_tools() -> Result<()> {
    let catalog = serde_json::to_string_pretty(&tally_tools())?;
    println!("{}", catalog);
    Ok(())
}

/// Run a tool with arguments given as JSON text
pub fn run_tool(db: &Database, tool: &str, args: Option<&str>) -> Result<serde_json::Value> {
    let input: serde_json::Value = match args {
        Some(text) => serde_json::from_str(text)
            .with_context(|| format!("Tool arguments are not valid JSON: {}", text))?,
        None => serde_json::json!({}),
    };

    debug!(tool, %input, "Calling tool");
    Ok(execute_tool(db, tool, &input))
}

pub fn cmd_call(db_path: &Path, tool: &str, args: Option<&str>) -> Result<()> {
    let db = open_db(db_path)?;
    let result = run_tool(&db, tool, args)?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if result["status"] == "error" {
        bail!("{} returned an error", tool);
    }
    Ok(())
}
