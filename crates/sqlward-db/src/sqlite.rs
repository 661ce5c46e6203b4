//! SQLite executor backed by rusqlite.

use std::path::Path;

use rusqlite::{
    params_from_iter,
    types::{Value as SqlValue, ValueRef},
    Connection,
};
use sqlward_query::{RawResult, Row, Value};
use tracing::trace;

use crate::{
    error::{DbError, Result},
    executor::Executor,
};

/// An [`Executor`] over a single SQLite connection.
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|err| DbError::ConnectionError(err.to_string()))?;
        Ok(Self {
            conn,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|err| DbError::ConnectionError(err.to_string()))?;
        Ok(Self {
            conn,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
        }
    }

    /// The underlying connection, e.g. for schema setup.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn batch(&self, stage: &'static str, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|err| DbError::TransactionFailed {
                stage,
                message: err.to_string(),
            })
    }
}

impl Executor for SqliteExecutor {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<RawResult> {
        let fail = |err: rusqlite::Error| DbError::QueryExecutionFailed {
            sql: sql.to_string(),
            params: params.to_vec(),
            message: err.to_string(),
        };

        let mut stmt = self.conn.prepare(sql).map_err(fail)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let readonly = stmt.readonly();
        let bound = params_from_iter(params.iter().map(to_sqlite));

        let mut rows = Vec::new();
        if names.is_empty() {
            stmt.execute(bound).map_err(fail)?;
        } else {
            let mut cursor = stmt.query(bound).map_err(fail)?;
            while let Some(row) = cursor.next().map_err(fail)? {
                let cells = names
                    .iter()
                    .enumerate()
                    .map(|(idx, name)| -> rusqlite::Result<(String, Value)> {
                        Ok((name.clone(), from_sqlite(row.get_ref(idx)?)))
                    })
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .map_err(fail)?;
                rows.push(Row::new(cells));
            }
        }

        let (affected, insert_id) = if readonly {
            (rows.len() as u64, None)
        } else {
            let affected = self.conn.changes() as u64;
            let is_insert = sql
                .trim_start()
                .get(..6)
                .is_some_and(|head| head.eq_ignore_ascii_case("INSERT"));
            // last_insert_rowid is the final row of a multi-row insert
            let insert_id = (is_insert && affected > 0)
                .then(|| self.conn.last_insert_rowid() - (affected as i64 - 1));
            (affected, insert_id)
        };

        trace!("sqlite: {} rows, {} affected", rows.len(), affected);
        Ok(RawResult {
            rows,
            affected,
            insert_id,
        })
    }

    fn begin(&mut self) -> Result<()> {
        self.batch("begin", "BEGIN")
    }

    fn commit(&mut self) -> Result<()> {
        self.batch("commit", "COMMIT")
    }

    fn rollback(&mut self) -> Result<()> {
        self.batch("rollback", "ROLLBACK")
    }
}

fn to_sqlite(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}
