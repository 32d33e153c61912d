//! MCP (Model Context Protocol) Server for Tally
//!
//! Exposes the transaction store to an agent host as MCP tools.
//!
//! # Architecture
//!
//! The host launches `tally mcp` as a subprocess and talks MCP over its
//! stdin/stdout. Logs go to stderr.
//!
//! # Available Tools
//!
//! - `create_transaction` - Record a transaction
//! - `get_monthly_spending` - Spending per category for a month
//! - `analyze_spending_history` - Transactions filtered by category and date range
//! - `get_current_date` - Today's date as YYYY-MM-DD
//!
//! Each tool answers with one text block holding the tagged JSON result
//! (`{"status": "success" | "error", ...}`). Error-status results also set
//! the MCP `isError` flag.

mod tools;

use std::sync::Arc;

use anyhow::Context;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use tally_core::db::Database;

pub use tools::*;

/// Tally MCP Server state
#[derive(Clone)]
pub struct TallyMcpServer {
    /// Database handle (wrapped for thread-safe access)
    db: Arc<Mutex<Database>>,
    /// Tool router for MCP operations
    tool_router: ToolRouter<Self>,
}

impl TallyMcpServer {
    /// Create a new MCP server with the given database
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            tool_router: Self::tool_router(),
        }
    }

    /// Get database access for tool implementations
    pub(crate) async fn db(&self) -> tokio::sync::MutexGuard<'_, Database> {
        self.db.lock().await
    }
}

/// Wrap a tagged tool result as MCP content
fn call_result<T: Serialize>(result: ToolResult<T>) -> CallToolResult {
    let content = vec![Content::text(
        serde_json::to_string_pretty(&result.to_json()).unwrap_or_default(),
    )];
    if result.is_success() {
        CallToolResult::success(content)
    } else {
        CallToolResult::error(content)
    }
}

#[tool_handler]
impl ServerHandler for TallyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tally".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Tally Personal Finance".to_string()),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Tally stores personal financial transactions. Use create_transaction to \
                 record a transaction, get_monthly_spending for per-category totals in a \
                 month, analyze_spending_history to list transactions with optional \
                 category and date filters, and get_current_date to resolve relative dates."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl TallyMcpServer {
    /// Record a new transaction
    #[tool(
        description = "Creates a new transaction in the database. Dates use YYYY-MM-DD; description is optional."
    )]
    async fn create_transaction(
        &self,
        Parameters(params): Parameters<CreateTransactionParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        Ok(call_result(tools::create_transaction(&db, params)))
    }

    /// Spending totals per category for one month
    #[tool(
        description = "Retrieves total spending per category for a specific month (MM) and year (YYYY)."
    )]
    async fn get_monthly_spending(
        &self,
        Parameters(params): Parameters<MonthlySpendingParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        Ok(call_result(tools::get_monthly_spending(&db, params)))
    }

    /// Filtered transaction history
    #[tool(
        description = "Lists transactions newest first. Optional filters: category (exact match), start_date and end_date (inclusive, YYYY-MM-DD)."
    )]
    async fn analyze_spending_history(
        &self,
        Parameters(params): Parameters<SpendingHistoryParams>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.db().await;
        Ok(call_result(tools::analyze_spending_history(&db, params)))
    }

    /// Today's date
    #[tool(description = "Gets the current date in YYYY-MM-DD format.")]
    async fn get_current_date(&self) -> Result<CallToolResult, McpError> {
        Ok(call_result(tools::get_current_date()))
    }
}

/// Serve MCP on stdin/stdout until the client disconnects
pub async fn serve_stdio(db: Database) -> anyhow::Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!(database = db.path(), "Starting MCP server on stdio");

    let service = TallyMcpServer::new(db)
        .serve(stdio())
        .await
        .map_err(|e| anyhow::anyhow!("MCP initialization failed: {}", e))?;

    let reason = service.waiting().await.context("MCP server task failed")?;
    info!(?reason, "MCP server stopped");

    Ok(())
}
