//! Tally Server
//!
//! Exposes the Tally transaction tools to an agent host over the Model
//! Context Protocol. The server speaks MCP on stdio and opens no network port.

pub mod mcp;

pub use mcp::{serve_stdio, TallyMcpServer};
