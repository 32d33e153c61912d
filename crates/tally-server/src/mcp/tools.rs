//! MCP Tool implementations for Tally
//!
//! Re-exports from tally_core::tools for MCP server use.
//! The actual implementations live in tally-core so the CLI's JSON dispatch
//! shares them.

pub use tally_core::tools::{
    // Functions
    analyze_spending_history,
    create_transaction,
    get_current_date,
    get_monthly_spending,
    // Params types
    CreateTransactionParams,
    MonthlySpendingParams,
    SpendingHistoryParams,
    // Result types
    Data,
    Message,
    ToolResult,
};
