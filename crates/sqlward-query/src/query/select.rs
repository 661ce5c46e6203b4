//! SELECT statement builder.

use sqlward_config::DialectOptions;
use sqlward_events::{EventSink, NullSink};
use tracing::{debug, trace};

use crate::{
    error::Result,
    escape::Whitelist,
    expr::Filter,
    fragment::SqlFragment,
};

use super::clause::{build_order_by, build_pagination, build_where, Page, Sort};

/// A SELECT statement over one whitelisted table.
///
/// # Example
///
/// ```rust
/// use sqlward_config::{Dialect, DialectOptions};
/// use sqlward_query::{Filter, Page, SelectQuery, Sort};
///
/// let options = DialectOptions::new(Dialect::Sqlite, "users", ["id", "name"]).unwrap();
/// let fragment = SelectQuery::new()
///     .columns(["id", "name"])
///     .filter(Filter::new().eq("name", "alice"))
///     .order_by(Sort::desc("id"))
///     .page(Page::new(2, 10))
///     .build(&options)
///     .unwrap();
///
/// assert_eq!(
///     fragment.sql(),
///     "SELECT \"id\", \"name\" FROM \"users\" WHERE \"name\" = ? ORDER BY \"id\" DESC LIMIT 10 OFFSET 10"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    columns: Vec<String>,
    filter: Filter,
    sorts: Vec<Sort>,
    page: Option<Page>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns to return. None means `*`.
    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn build(&self, options: &DialectOptions) -> Result<SqlFragment> {
        self.build_with(options, &NullSink)
    }

    /// Builds the statement, reporting diagnostics to `events`.
    pub fn build_with(&self, options: &DialectOptions, events: &dyn EventSink) -> Result<SqlFragment> {
        let table = options.table_sql()?;
        let select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(|column| options.column_sql(column))
                .collect::<Result<Vec<_>>>()?
                .join(", ")
        };

        let (where_sql, mut params) = build_where(options, &self.filter, events)?.into_parts();
        let order_by = build_order_by(options, &self.sorts)?;

        let mut sql = format!("SELECT {} FROM {}", select, table);
        if !where_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&where_sql);
        }
        if !order_by.is_empty() {
            sql.push(' ');
            sql.push_str(order_by.sql());
        }
        if let Some(page) = &self.page {
            let pagination = build_pagination(options, page, !order_by.is_empty())?;
            sql.push(' ');
            sql.push_str(pagination.sql());
            params.extend(pagination.into_parts().1);
        }

        debug!("built select: {}", sql);
        trace!("select params: {:?}", params);
        Ok(SqlFragment::new(sql, params))
    }

    /// Builds `SELECT COUNT(*)` with the same WHERE clause, ignoring columns,
    /// ordering and pagination.
    pub fn build_count(&self, options: &DialectOptions, events: &dyn EventSink) -> Result<SqlFragment> {
        let table = options.table_sql()?;
        let (where_sql, params) = build_where(options, &self.filter, events)?.into_parts();

        let mut sql = format!("SELECT COUNT(*) FROM {}", table);
        if !where_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&where_sql);
        }

        debug!("built count: {}", sql);
        Ok(SqlFragment::new(sql, params))
    }
}
