//! DELETE statement builder.

use sqlward_config::DialectOptions;
use sqlward_events::{EventSink, NullSink};
use tracing::{debug, trace};

use crate::{error::Result, escape::Whitelist, expr::Filter, fragment::SqlFragment};

use super::clause::build_where;

/// A DELETE statement. An empty filter deletes every row of the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteQuery {
    filter: Filter,
}

impl DeleteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn build(&self, options: &DialectOptions) -> Result<SqlFragment> {
        self.build_with(options, &NullSink)
    }

    pub fn build_with(&self, options: &DialectOptions, events: &dyn EventSink) -> Result<SqlFragment> {
        let table = options.table_sql()?;
        let (where_sql, params) = build_where(options, &self.filter, events)?.into_parts();

        let mut sql = format!("DELETE FROM {}", table);
        if !where_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&where_sql);
        }

        debug!("built delete: {}", sql);
        trace!("delete params: {:?}", params);
        Ok(SqlFragment::new(sql, params))
    }
}
