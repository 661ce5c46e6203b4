//! The execution seam between the facade and a database driver.

use sqlward_query::{RawResult, Value};

use crate::error::Result;

/// Runs SQL produced by the builders.
///
/// Implementations report driver failures as
/// [`DbError::QueryExecutionFailed`](crate::DbError::QueryExecutionFailed)
/// carrying the statement and its parameters, and transaction primitive
/// failures as [`DbError::TransactionFailed`](crate::DbError::TransactionFailed).
pub trait Executor {
    /// Executes one statement with positional `?` parameters.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<RawResult>;

    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;
}

impl<X: Executor + ?Sized> Executor for &mut X {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<RawResult> {
        (**self).execute(sql, params)
    }

    fn begin(&mut self) -> Result<()> {
        (**self).begin()
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<()> {
        (**self).rollback()
    }
}
