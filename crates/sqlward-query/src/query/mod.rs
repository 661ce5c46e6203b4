//! Statement builders.
//!
//! Each statement type has its own builder. Builders are plain values: they
//! hold the caller's request and are turned into an [`SqlFragment`] by
//! `build(&options)`, which validates every identifier against the
//! [`DialectOptions`] whitelist first. Nothing is emitted if validation fails.
//!
//! - [`SelectQuery`] - columns, filter, ordering, pagination.
//! - [`InsertQuery`] / [`BulkInsert`] - single-row insert and batched multi-row insert.
//! - [`UpdateQuery`] - SET list plus a mandatory filter.
//! - [`DeleteQuery`] - filter only.
//!
//! [`SqlFragment`]: crate::fragment::SqlFragment
//! [`DialectOptions`]: sqlward_config::DialectOptions

pub mod clause;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use clause::{build_order_by, build_pagination, build_where, Direction, Page, Sort};
pub use delete::DeleteQuery;
pub use insert::{BulkInsert, InsertBatch, InsertPlan, InsertQuery};
pub use select::SelectQuery;
pub use update::UpdateQuery;
