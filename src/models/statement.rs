//! Statement descriptors.

use crate::models::SqlValue;

/// SQL text plus its ordered bound values for one execution.
///
/// Produced by the builders in [`crate::sql`] and consumed immediately by
/// the executor; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The statement text, with positional placeholders for bound values.
    pub sql: String,
    /// Values bound 1-based in order.
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Create a statement with no bound values.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Create a statement with bound values.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}
