//! INSERT statement builders.
//!
//! [`InsertQuery`] builds one single-row statement. [`BulkInsert`] plans a
//! multi-row insert as one or more physical statements so that none carries
//! more bound parameters (or rows) than the dialect allows.

use std::ops::Range;

use sqlward_config::{DialectOptions, IdStrategy};
use sqlward_events::{EventSink, NullSink, QueryEvent};
use tracing::{debug, trace};

use crate::{
    error::{QueryError, Result},
    escape::Whitelist,
    fragment::SqlFragment,
    value::Value,
};

/// A single-row INSERT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertQuery {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl InsertQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn build(&self, options: &DialectOptions) -> Result<SqlFragment> {
        if self.columns.is_empty() {
            return Err(QueryError::MissingInsertData);
        }
        let columns = insert_columns(options, &self.columns)?;
        batch_size(self.columns.len(), options.max_params(), options.max_insert_rows())?;
        let sql = render_insert(options, &columns, 1)?;
        debug!("built insert: {}", sql);
        trace!("insert params: {:?}", self.values);
        Ok(SqlFragment::new(sql, self.values.clone()))
    }
}

/// A multi-row INSERT with one shared column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkInsert {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl BulkInsert {
    pub fn new<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: vec![],
        }
    }

    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        self.rows.extend(rows);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn plan(&self, options: &DialectOptions) -> Result<InsertPlan> {
        self.plan_with(options, &NullSink)
    }

    /// Splits the rows into consecutive batches and builds one statement per
    /// batch.
    pub fn plan_with(&self, options: &DialectOptions, events: &dyn EventSink) -> Result<InsertPlan> {
        if self.columns.is_empty() || self.rows.is_empty() {
            return Err(QueryError::MissingInsertData);
        }

        let width = self.columns.len();
        let columns = insert_columns(options, &self.columns)?;
        if let Some((row, values)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != width)
        {
            return Err(QueryError::RaggedInsertRows {
                row,
                expected: width,
                found: values.len(),
            });
        }

        let batch_size = batch_size(width, options.max_params(), options.max_insert_rows())?;

        let mut statements = Vec::with_capacity(self.rows.len().div_ceil(batch_size));
        for (idx, chunk) in self.rows.chunks(batch_size).enumerate() {
            let start = idx * batch_size;
            let sql = render_insert(options, &columns, chunk.len())?;
            let params = chunk.iter().flatten().cloned().collect();
            statements.push(InsertBatch {
                fragment: SqlFragment::new(sql, params),
                rows: start..start + chunk.len(),
            });
        }

        debug!(
            "planned insert of {} rows into {} as {} statements of at most {} rows",
            self.rows.len(),
            options.table(),
            statements.len(),
            batch_size
        );
        events.emit(QueryEvent::BatchPlanned {
            table: options.table().to_string(),
            rows: self.rows.len(),
            statements: statements.len(),
        });

        Ok(InsertPlan {
            statements,
            total_rows: self.rows.len(),
            batch_size,
        })
    }
}

/// Rows per statement for rows of `width` values.
///
/// A row wider than `max_params` can never be inserted and is an error
/// rather than a zero-row batch.
pub fn batch_size(width: usize, max_params: usize, max_rows: Option<usize>) -> Result<usize> {
    if width == 0 {
        return Err(QueryError::MissingInsertData);
    }
    if width > max_params {
        return Err(QueryError::RowTooWide {
            width,
            max_params,
        });
    }
    let by_params = max_params / width;
    Ok(max_rows.map_or(by_params, |rows| by_params.min(rows)))
}

/// One physical INSERT statement and the input rows it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertBatch {
    pub fragment: SqlFragment,
    pub rows: Range<usize>,
}

impl InsertBatch {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A logical insert decomposed into physical statements, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPlan {
    statements: Vec<InsertBatch>,
    total_rows: usize,
    batch_size: usize,
}

impl InsertPlan {
    pub fn statements(&self) -> &[InsertBatch] {
        &self.statements
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn iter(&self) -> impl Iterator<Item = &InsertBatch> {
        self.statements.iter()
    }
}

impl IntoIterator for InsertPlan {
    type Item = InsertBatch;
    type IntoIter = std::vec::IntoIter<InsertBatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

/// Whitelists, escapes and de-duplicates the insert column list.
fn insert_columns(options: &DialectOptions, columns: &[String]) -> Result<Vec<String>> {
    for (idx, column) in columns.iter().enumerate() {
        if columns[..idx].contains(column) {
            return Err(QueryError::DuplicateColumn(column.clone()));
        }
    }
    columns
        .iter()
        .map(|column| options.column_sql(column))
        .collect()
}

/// `INSERT INTO t (a, b) [OUTPUT ...] VALUES (?, ?), ... [RETURNING ...]`
fn render_insert(options: &DialectOptions, columns: &[String], rows: usize) -> Result<String> {
    let table = options.table_sql()?;
    let row = format!("({})", vec!["?"; columns.len()].join(", "));
    let values = vec![row.as_str(); rows].join(", ");

    let id_column = options
        .id_column()
        .map(|id| options.escape(id))
        .transpose()?;

    let mut sql = format!("INSERT INTO {} ({})", table, columns.join(", "));
    match (options.dialect().id_strategy(), &id_column) {
        (IdStrategy::Output, Some(id)) => {
            sql.push_str(&format!(" OUTPUT inserted.{} VALUES {}", id, values));
        }
        (IdStrategy::Returning, Some(id)) => {
            sql.push_str(&format!(" VALUES {} RETURNING {}", values, id));
        }
        _ => {
            sql.push_str(" VALUES ");
            sql.push_str(&values);
        }
    }
    Ok(sql)
}
