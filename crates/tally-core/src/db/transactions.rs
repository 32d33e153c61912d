//! Transaction operations

use rusqlite::params;
use rusqlite::types::ValueRef;
use tracing::warn;

use super::transaction_filter::TransactionFilter;
use super::Database;
use crate::error::Result;
use crate::models::{CategoryTotal, NewTransaction, TransactionRecord};

impl Database {
    /// Insert a transaction, returning its new ID
    ///
    /// Values are stored verbatim; nothing is validated beyond the column
    /// constraints.
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO transactions (date, amount, category, description) VALUES (?, ?, ?, ?)",
            params![tx.date, tx.amount, tx.category, tx.description],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Sum amounts per category for one month
    ///
    /// Month and year are matched against `strftime` of the stored date text,
    /// so `month` must be two digits (`"03"`, not `"3"`). Rows whose date SQLite
    /// cannot read are skipped. Row order is whatever the store returns.
    pub fn monthly_spending(&self, month: &str, year: i64) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) AS total
            FROM transactions
            WHERE strftime('%m', date) = ? AND strftime('%Y', date) = ?
            GROUP BY category
            "#,
        )?;

        let totals = stmt
            .query_map(params![month, year.to_string()], |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(totals)
    }

    /// Transactions matching the filter, newest date first
    ///
    /// Rows whose stored amount is not a number (possible when another writer
    /// bypassed `insert_transaction`) are left out rather than failing the
    /// whole query.
    pub fn spending_history(&self, filter: TransactionFilter<'_>) -> Result<Vec<TransactionRecord>> {
        let conn = self.conn()?;
        let filter = filter.build();

        let sql = format!(
            "SELECT t.id, t.date, t.amount, t.category, t.description FROM transactions t {} {}",
            filter.where_clause, filter.order_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(filter.params_refs().as_slice(), |row| {
                let id: i64 = row.get(0)?;
                let amount = match row.get_ref(2)? {
                    ValueRef::Real(value) => Some(value),
                    ValueRef::Integer(value) => Some(value as f64),
                    _ => None,
                };
                let record = match amount {
                    Some(amount) => Some(TransactionRecord {
                        date: row.get(1)?,
                        amount,
                        category: row.get(3)?,
                        description: row.get(4)?,
                    }),
                    None => None,
                };
                Ok((id, record))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let records = rows
            .into_iter()
            .filter_map(|(id, record)| {
                if record.is_none() {
                    warn!(id, "Skipping transaction with non-numeric amount");
                }
                record
            })
            .collect();

        Ok(records)
    }

    /// Count stored transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}
