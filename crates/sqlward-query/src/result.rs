//! Result objects.
//!
//! [`RawResult`] is what an executor hands back for one physical statement.
//! The other types describe a completed logical operation and never change
//! after construction.

use serde::{ser::SerializeMap, Serialize, Serializer};
use sqlward_config::{DialectOptions, IdStrategy};
use tracing::warn;

use crate::{
    error::{QueryError, Result},
    value::Value,
};

/// One result row: column name to value, in select-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn new(cells: Vec<(String, Value)>) -> Self {
        Self {
            cells,
        }
    }

    /// Looks up a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Output of one physical statement, as reported by the driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResult {
    pub rows: Vec<Row>,
    pub affected: u64,
    /// Driver-reported id of the first row inserted by the statement, if any.
    pub insert_id: Option<i64>,
}

/// Rows returned by a query plus the affected-row count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    rows: Vec<Row>,
    affected: u64,
}

impl RowSet {
    pub fn new(rows: Vec<Row>, affected: u64) -> Self {
        Self {
            rows,
            affected,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn affected_count(&self) -> u64 {
        self.affected
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl From<RawResult> for RowSet {
    fn from(raw: RawResult) -> Self {
        Self::new(raw.rows, raw.affected)
    }
}

/// Outcome of a single-row insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertResult {
    id: Option<Value>,
    affected: u64,
}

impl InsertResult {
    /// Reads the generated id from `raw` the way `options`' dialect reports it.
    pub fn from_raw(options: &DialectOptions, raw: &RawResult) -> Self {
        let id = match options.dialect().id_strategy() {
            IdStrategy::FirstInsertId => raw.insert_id.map(Value::Integer),
            IdStrategy::Returning | IdStrategy::Output => options
                .id_column()
                .and_then(|column| raw.rows.first()?.get(column).cloned()),
        };
        Self {
            id,
            affected: raw.affected,
        }
    }

    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    pub fn affected_count(&self) -> u64 {
        self.affected
    }
}

/// Outcome of a bulk insert, however many statements it took.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkInsertResult {
    ids: Vec<Value>,
    affected: u64,
    statements: usize,
}

impl BulkInsertResult {
    /// Generated ids, one per input row, in input order.
    pub fn ids(&self) -> &[Value] {
        &self.ids
    }

    pub fn affected_count(&self) -> u64 {
        self.affected
    }

    /// Number of physical statements executed.
    pub fn statement_count(&self) -> usize {
        self.statements
    }
}

/// Accumulates per-batch results into one [`BulkInsertResult`].
///
/// Batches must be recorded in plan order.
#[derive(Debug)]
pub struct BulkInsertCollector {
    strategy: IdStrategy,
    id_column: Option<String>,
    total_rows: usize,
    ids: Vec<Value>,
    affected: u64,
    statements: usize,
}

impl BulkInsertCollector {
    pub fn new(options: &DialectOptions, total_rows: usize) -> Self {
        Self {
            strategy: options.dialect().id_strategy(),
            id_column: options.id_column().map(str::to_string),
            total_rows,
            ids: Vec::with_capacity(total_rows),
            affected: 0,
            statements: 0,
        }
    }

    /// Whether generated ids are collected at all.
    pub fn collects_ids(&self) -> bool {
        match self.strategy {
            IdStrategy::FirstInsertId => true,
            IdStrategy::Returning | IdStrategy::Output => self.id_column.is_some(),
        }
    }

    /// Records the result of the batch covering `batch_rows` input rows.
    pub fn record(&mut self, batch_rows: usize, raw: &RawResult) -> Result<()> {
        self.statements += 1;
        self.affected += raw.affected;

        if !self.collects_ids() {
            return Ok(());
        }

        let ids: Vec<Value> = match self.strategy {
            IdStrategy::FirstInsertId => match raw.insert_id {
                Some(first) => (0..batch_rows as i64).map(|i| Value::Integer(first + i)).collect(),
                None => vec![],
            },
            IdStrategy::Returning | IdStrategy::Output => {
                let column = self.id_column.as_deref().unwrap_or_default();
                raw.rows
                    .iter()
                    .filter_map(|row| row.get(column).cloned())
                    .collect()
            }
        };

        if ids.len() != batch_rows {
            warn!(
                "insert batch #{} reported {} ids for {} rows",
                self.statements,
                ids.len(),
                batch_rows
            );
            return Err(QueryError::IdCountMismatch {
                expected: batch_rows,
                found: ids.len(),
            });
        }
        self.ids.extend(ids);
        Ok(())
    }

    pub fn finish(self) -> Result<BulkInsertResult> {
        if self.collects_ids() && self.ids.len() != self.total_rows {
            return Err(QueryError::IdCountMismatch {
                expected: self.total_rows,
                found: self.ids.len(),
            });
        }
        Ok(BulkInsertResult {
            ids: self.ids,
            affected: self.affected,
            statements: self.statements,
        })
    }
}
