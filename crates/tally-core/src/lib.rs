//! Tally Core Library
//!
//! The transaction store behind the Tally agent tools:
//! - Database access and idempotent schema creation
//! - The four tool operations (`create_transaction`, `get_monthly_spending`,
//!   `analyze_spending_history`, `get_current_date`)
//! - Tool catalog with JSON Schemas and a JSON dispatcher for agent hosts

pub mod db;
pub mod error;
pub mod models;
pub mod tools;

pub use db::Database;
pub use error::{Error, Result};
pub use tools::{execute_tool, tally_tools, Data, Message, ToolDefinition, ToolResult};
