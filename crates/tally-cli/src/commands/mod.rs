//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `serve` - MCP server command
//! - `tools` - Tool catalog and one-shot tool calls

pub mod core;
pub mod serve;
pub mod tools;

// Re-export command functions for main.rs
pub use core::*;
pub use serve::*;
pub use tools::*;
