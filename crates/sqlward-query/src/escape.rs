//! Identifier escaping and whitelist checks.
//!
//! Every table and column name that reaches SQL text goes through here.

use sqlward_config::{Dialect, DialectOptions};

use crate::error::{QueryError, Result};

/// Quotes `identifier` for `dialect`.
///
/// Qualified names (`schema.table`) are split on `.` and each segment is
/// quoted separately. The closing quote character is doubled inside a
/// segment.
pub fn escape_identifier(dialect: Dialect, identifier: &str) -> Result<String> {
    if identifier.trim().is_empty() {
        return Err(QueryError::InvalidIdentifier(identifier.to_string()));
    }

    let (open, close) = dialect.quotes();
    let mut escaped = String::with_capacity(identifier.len() + 2);

    for (idx, segment) in identifier.split('.').enumerate() {
        if segment.trim().is_empty() {
            return Err(QueryError::InvalidIdentifier(identifier.to_string()));
        }
        if idx > 0 {
            escaped.push('.');
        }
        escaped.push(open);
        for ch in segment.chars() {
            if ch == close {
                escaped.push(close);
            }
            escaped.push(ch);
        }
        escaped.push(close);
    }

    Ok(escaped)
}

/// Whitelist-and-escape access to a table's identifiers.
pub trait Whitelist {
    /// Escapes an arbitrary identifier with the table's dialect.
    fn escape(&self, identifier: &str) -> Result<String>;

    /// The escaped table name.
    fn table_sql(&self) -> Result<String>;

    /// Checks `column` against the whitelist and escapes it.
    fn column_sql(&self, column: &str) -> Result<String>;
}

impl Whitelist for DialectOptions {
    fn escape(&self, identifier: &str) -> Result<String> {
        escape_identifier(self.dialect(), identifier)
    }

    fn table_sql(&self) -> Result<String> {
        self.escape(self.table())
    }

    fn column_sql(&self, column: &str) -> Result<String> {
        if !self.has_column(column) {
            return Err(QueryError::UnknownColumn {
                table: self.table().to_string(),
                column: column.to_string(),
            });
        }
        self.escape(column)
    }
}
