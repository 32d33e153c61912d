//! Domain models for Tally

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Data for creating a new transaction
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// ISO `YYYY-MM-DD` text, stored verbatim
    pub date: String,
    /// Sign convention (income vs. expense) is up to the caller
    pub amount: f64,
    pub category: String,
    pub description: String,
}

/// A transaction as returned by history queries (no id or created_at)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TransactionRecord {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
}

/// Sum of amounts for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}
