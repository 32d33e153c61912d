//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::db::{Database, TABLES};

/// Open the database, creating the schema if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).with_context(|| format!("Failed to open database at {}", path_str))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    let present = db.table_names().context("Failed to list tables")?;
    for table in TABLES {
        let mark = if present.iter().any(|t| t == table) {
            "✓"
        } else {
            "✗"
        };
        println!("   {} {}", mark, table);
    }

    let count = db
        .count_transactions()
        .context("Failed to count transactions")?;
    println!("   Existing transactions: {}", count);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!(
        "  1. Register `tally --db {} mcp` with your agent host",
        db_path.display()
    );
    println!("  2. Or try a tool directly: tally call get_current_date");

    Ok(())
}
