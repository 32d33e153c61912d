//! Transaction filter builder for history queries
//!
//! Empty strings mean "no filter on this dimension". Date bounds are compared
//! against the stored text, so they order chronologically only when every
//! stored date is a well-formed `YYYY-MM-DD`.

/// Builder for the WHERE clause of a history query
///
/// The lifetime `'query` is how long the borrowed filter values must live.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionFilter<'query> {
    pub category: Option<&'query str>,
    pub start_date: Option<&'query str>,
    pub end_date: Option<&'query str>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: &'static str,
    /// Parameters for the query, in placeholder order
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

/// Treat an empty string as an absent filter
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl<'query> TransactionFilter<'query> {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact match on category
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = non_empty(category);
        self
    }

    /// Inclusive lower bound on date
    pub fn start_date(mut self, date: Option<&'query str>) -> Self {
        self.start_date = non_empty(date);
        self
    }

    /// Inclusive upper bound on date
    pub fn end_date(mut self, date: Option<&'query str>) -> Self {
        self.end_date = non_empty(date);
        self
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(category) = self.category {
            conditions.push("t.category = ?");
            params.push(Box::new(category.to_string()));
        }

        if let Some(start) = self.start_date {
            conditions.push("t.date >= ?");
            params.push(Box::new(start.to_string()));
        }

        if let Some(end) = self.end_date {
            conditions.push("t.date <= ?");
            params.push(Box::new(end.to_string()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        FilterResult {
            where_clause,
            // Newest first; equal dates keep insertion order
            order_clause: "ORDER BY t.date DESC, t.id ASC",
            params,
        }
    }
}

impl FilterResult {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
