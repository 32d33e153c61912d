//! MCP server command implementation

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub async fn cmd_mcp(db_path: &Path) -> Result<()> {
    // stdout belongs to the protocol; status goes to stderr
    eprintln!("🚀 Starting Tally MCP server on stdio...");
    eprintln!("   Database: {}", db_path.display());

    let db = open_db(db_path)?;
    tally_server::serve_stdio(db).await
}
