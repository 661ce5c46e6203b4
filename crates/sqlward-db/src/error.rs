//! Error types for sqlward-db.

use miette::Diagnostic;
use sqlward_config::ConfigError;
use sqlward_query::{QueryError, Value};
use thiserror::Error;

/// Database error type for sqlward-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection failed: {0}")]
    #[diagnostic(
        code(sqlward_db::connection),
        help("Check if the database file exists and is accessible")
    )]
    ConnectionError(String),

    #[error("Query execution failed: {message}\n  sql: {sql}")]
    #[diagnostic(code(sqlward_db::query_execution))]
    QueryExecutionFailed {
        sql: String,
        params: Vec<Value>,
        message: String,
    },

    #[error("Unexpected result: {message}\n  sql: {sql}")]
    #[diagnostic(code(sqlward_db::unexpected_result))]
    UnexpectedResult { sql: String, message: String },

    #[error("Transaction {stage} failed: {message}")]
    #[diagnostic(code(sqlward_db::transaction))]
    TransactionFailed { stage: &'static str, message: String },
}

impl DbError {
    /// The SQL text of a failed statement, if this error carries one.
    pub fn sql(&self) -> Option<&str> {
        match self {
            DbError::QueryExecutionFailed { sql, .. } | DbError::UnexpectedResult { sql, .. } => {
                Some(sql)
            }
            _ => None,
        }
    }
}

/// Result type alias for sqlward-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
