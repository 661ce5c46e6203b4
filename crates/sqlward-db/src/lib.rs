//! Execution facade for sqlward.
//!
//! The builders in `sqlward-query` only produce SQL. This crate runs it:
//! [`Executor`] is the seam to a driver, [`SqliteExecutor`] is the bundled
//! implementation, and [`Database`] sequences builders against an executor
//! and returns result objects.
//!
//! ```rust
//! use sqlward_config::{Dialect, DialectOptions};
//! use sqlward_db::{Database, SqliteExecutor};
//! use sqlward_query::{BulkInsert, Filter, SelectQuery, Value};
//!
//! let executor = SqliteExecutor::open_in_memory().unwrap();
//! executor
//!     .connection()
//!     .execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")
//!     .unwrap();
//!
//! let options = DialectOptions::new(Dialect::Sqlite, "users", ["id", "name"])
//!     .unwrap()
//!     .with_id_column("id");
//! let mut db = Database::new(executor, options);
//!
//! let inserted = db
//!     .insert_rows(&BulkInsert::new(["name"]).row(["a"]).row(["b"]))
//!     .unwrap();
//! assert_eq!(inserted.ids(), &[Value::Integer(1), Value::Integer(2)]);
//!
//! let rows = db
//!     .select(&SelectQuery::new().filter(Filter::new().eq("name", "b")))
//!     .unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

pub mod database;
pub mod error;
pub mod executor;
pub mod sqlite;

pub use database::Database;
pub use error::{DbError, Result};
pub use executor::Executor;
pub use sqlite::SqliteExecutor;
