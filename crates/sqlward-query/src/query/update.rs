//! UPDATE statement builder.

use sqlward_config::DialectOptions;
use sqlward_events::{EventSink, NullSink};
use tracing::{debug, trace};

use crate::{
    error::{QueryError, Result},
    escape::Whitelist,
    expr::Filter,
    fragment::SqlFragment,
    value::Value,
};

use super::clause::build_where;

/// An UPDATE statement. Both the SET list and the WHERE filter are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateQuery {
    set: Vec<(String, Value)>,
    filter: Filter,
}

impl UpdateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column = value` to the SET list.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.push((column.into(), value.into()));
        self
    }

    pub fn set_all<I, C, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Value>,
    {
        self.set
            .extend(pairs.into_iter().map(|(c, v)| (c.into(), v.into())));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn build(&self, options: &DialectOptions) -> Result<SqlFragment> {
        self.build_with(options, &NullSink)
    }

    pub fn build_with(&self, options: &DialectOptions, events: &dyn EventSink) -> Result<SqlFragment> {
        if self.set.is_empty() || self.filter.is_empty() {
            return Err(QueryError::EmptyUpdateClause);
        }

        let table = options.table_sql()?;
        let mut assignments = Vec::with_capacity(self.set.len());
        let mut params = Vec::with_capacity(self.set.len());
        for (idx, (column, value)) in self.set.iter().enumerate() {
            if self.set[..idx].iter().any(|(c, _)| c == column) {
                return Err(QueryError::DuplicateColumn(column.clone()));
            }
            assignments.push(format!("{} = ?", options.column_sql(column)?));
            params.push(value.clone());
        }

        let (where_sql, where_params) = build_where(options, &self.filter, events)?.into_parts();
        params.extend(where_params);

        let sql = format!("UPDATE {} SET {} {}", table, assignments.join(", "), where_sql);
        debug!("built update: {}", sql);
        trace!("update params: {:?}", params);
        Ok(SqlFragment::new(sql, params))
    }
}
