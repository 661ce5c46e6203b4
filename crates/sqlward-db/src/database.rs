//! The database facade.
//!
//! [`Database`] owns the current [`DialectOptions`], an [`Executor`] and an
//! event sink. Each operation builds its statement(s), runs them in order
//! and wraps the raw output in a result object.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use sqlward_config::DialectOptions;
use sqlward_events::{EventSinkHandle, NullSink, QueryEvent, StatementKind, TransactionStage};
use sqlward_query::{
    BulkInsert, BulkInsertCollector, BulkInsertResult, DeleteQuery, InsertQuery, InsertResult,
    RawResult, RowSet, SelectQuery, SqlFragment, UpdateQuery,
};
use tracing::{debug, trace, warn};

use crate::{
    error::{DbError, Result},
    executor::Executor,
};

pub struct Database<X> {
    executor: X,
    options: DialectOptions,
    events: EventSinkHandle,
}

impl<X: Executor> Database<X> {
    pub fn new(executor: X, options: DialectOptions) -> Self {
        Self {
            executor,
            options,
            events: Arc::new(NullSink),
        }
    }

    /// Reports diagnostics and execution milestones to `events`.
    pub fn with_events(mut self, events: EventSinkHandle) -> Self {
        self.events = events;
        self
    }

    pub fn options(&self) -> &DialectOptions {
        &self.options
    }

    /// Replaces the options with `self.options().reconfigure(overrides)`.
    ///
    /// On error the current options are kept.
    pub fn reconfigure<I, K>(&mut self, overrides: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, JsonValue)>,
        K: Into<String>,
    {
        self.options = self.options.reconfigure(overrides)?;
        Ok(())
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut X {
        &mut self.executor
    }

    pub fn into_executor(self) -> X {
        self.executor
    }

    pub fn select(&mut self, query: &SelectQuery) -> Result<RowSet> {
        let fragment = query.build_with(&self.options, self.events.as_ref())?;
        let raw = self.run(StatementKind::Select, &fragment)?;
        Ok(RowSet::from(raw))
    }

    /// Counts the rows matching `query`'s filter.
    pub fn count(&mut self, query: &SelectQuery) -> Result<u64> {
        let fragment = query.build_count(&self.options, self.events.as_ref())?;
        let raw = self.run(StatementKind::Select, &fragment)?;
        let count = raw
            .rows
            .first()
            .and_then(|row| row.iter().next())
            .and_then(|(_, value)| value.as_i64())
            .ok_or_else(|| DbError::UnexpectedResult {
                sql: fragment.sql().to_string(),
                message: "COUNT(*) returned no integer cell".to_string(),
            })?;
        Ok(count.max(0) as u64)
    }

    pub fn insert_row(&mut self, query: &InsertQuery) -> Result<InsertResult> {
        let fragment = query.build(&self.options)?;
        let raw = self.run(StatementKind::Insert, &fragment)?;
        Ok(InsertResult::from_raw(&self.options, &raw))
    }

    /// Inserts every row of `insert`, splitting it into as many statements
    /// as the parameter ceiling requires.
    ///
    /// Statements run in input order. The first failure stops the insert and
    /// is returned as is; rows from earlier statements stay pending in any
    /// enclosing transaction.
    pub fn insert_rows(&mut self, insert: &BulkInsert) -> Result<BulkInsertResult> {
        let plan = insert.plan_with(&self.options, self.events.as_ref())?;
        let mut collector = BulkInsertCollector::new(&self.options, plan.total_rows());

        for batch in plan.iter() {
            debug!(
                table = self.options.table(),
                "inserting rows {}..{}",
                batch.rows.start,
                batch.rows.end
            );
            let raw = self.run(StatementKind::Insert, &batch.fragment)?;
            collector.record(batch.row_count(), &raw)?;
        }

        Ok(collector.finish()?)
    }

    /// Returns the number of updated rows.
    pub fn update(&mut self, query: &UpdateQuery) -> Result<u64> {
        let fragment = query.build_with(&self.options, self.events.as_ref())?;
        Ok(self.run(StatementKind::Update, &fragment)?.affected)
    }

    /// Returns the number of deleted rows.
    pub fn delete(&mut self, query: &DeleteQuery) -> Result<u64> {
        let fragment = query.build_with(&self.options, self.events.as_ref())?;
        Ok(self.run(StatementKind::Delete, &fragment)?.affected)
    }

    /// Runs `f` inside a transaction.
    ///
    /// Commits when `f` returns `Ok`. On `Err`, or when the commit fails, the
    /// transaction is rolled back and the first error is returned, even if the
    /// rollback itself fails.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.executor.begin()?;
        self.events.emit(QueryEvent::Transaction {
            stage: TransactionStage::Begin,
        });

        match f(self) {
            Ok(value) => match self.executor.commit() {
                Ok(()) => {
                    self.events.emit(QueryEvent::Transaction {
                        stage: TransactionStage::Commit,
                    });
                    Ok(value)
                }
                Err(err) => {
                    self.abort();
                    Err(err)
                }
            },
            Err(err) => {
                self.abort();
                Err(err)
            }
        }
    }

    fn abort(&mut self) {
        if let Err(rollback_err) = self.executor.rollback() {
            warn!("rollback failed after error: {}", rollback_err);
        }
        self.events.emit(QueryEvent::Transaction {
            stage: TransactionStage::Rollback,
        });
    }

    fn run(&mut self, kind: StatementKind, fragment: &SqlFragment) -> Result<RawResult> {
        debug!(
            table = self.options.table(),
            kind = kind.as_str(),
            "executing {}",
            fragment.sql()
        );
        trace!("params: {:?}", fragment.params());

        let raw = self.executor.execute(fragment.sql(), fragment.params())?;
        self.events.emit(QueryEvent::StatementExecuted {
            kind,
            table: self.options.table().to_string(),
            affected: raw.affected,
        });
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlward_config::Dialect;
    use sqlward_events::CollectorSink;
    use sqlward_query::{Filter, QueryError, Row, Value};

    use super::*;

    /// Records every call and replays canned results.
    #[derive(Default)]
    struct Recorder {
        statements: Vec<(String, Vec<Value>)>,
        calls: Vec<&'static str>,
        next_insert_id: i64,
        fail_on: Option<usize>,
        fail_commit: bool,
    }

    impl Executor for Recorder {
        fn execute(&mut self, sql: &str, params: &[Value]) -> Result<RawResult> {
            if self.fail_on == Some(self.statements.len()) {
                return Err(DbError::QueryExecutionFailed {
                    sql: sql.to_string(),
                    params: params.to_vec(),
                    message: "boom".to_string(),
                });
            }
            self.statements.push((sql.to_string(), params.to_vec()));
            self.calls.push("execute");

            let rows = params.len() as u64;
            let first = self.next_insert_id;
            self.next_insert_id += rows as i64;
            let returned = if sql.contains("OUTPUT") {
                (first..first + rows as i64)
                    .map(|id| Row::new(vec![("id".to_string(), Value::Integer(id))]))
                    .collect()
            } else {
                vec![]
            };
            Ok(RawResult {
                rows: returned,
                affected: rows,
                insert_id: Some(first),
            })
        }

        fn begin(&mut self) -> Result<()> {
            self.calls.push("begin");
            Ok(())
        }

        fn commit(&mut self) -> Result<()> {
            self.calls.push("commit");
            if self.fail_commit {
                return Err(DbError::TransactionFailed {
                    stage: "commit",
                    message: "disk full".to_string(),
                });
            }
            Ok(())
        }

        fn rollback(&mut self) -> Result<()> {
            self.calls.push("rollback");
            Ok(())
        }
    }

    fn database(dialect: Dialect) -> Database<Recorder> {
        let options = DialectOptions::new(dialect, "users", ["id", "age"])
            .unwrap()
            .with_id_column("id");
        Database::new(
            Recorder {
                next_insert_id: 1,
                ..Default::default()
            },
            options,
        )
    }

    fn bulk(rows: i64) -> BulkInsert {
        BulkInsert::new(["age"]).rows((0..rows).map(|i| vec![Value::Integer(i)]))
    }

    #[test]
    fn test_mysql_bulk_insert_ids_follow_first_insert_id() {
        let mut db = database(Dialect::MySql);
        db.reconfigure([("max_params", json!(4))]).unwrap();

        let result = db.insert_rows(&bulk(10)).unwrap();
        assert_eq!(result.statement_count(), 3);
        assert_eq!(result.affected_count(), 10);
        assert_eq!(
            result.ids(),
            (1..=10).map(Value::Integer).collect::<Vec<_>>().as_slice()
        );

        let sizes: Vec<_> = db
            .executor()
            .statements
            .iter()
            .map(|(_, params)| params.len())
            .collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_sql_server_bulk_insert_uses_output_rows() {
        let mut db = database(Dialect::SqlServer);
        let result = db.insert_rows(&bulk(2_500)).unwrap();

        assert_eq!(result.statement_count(), 3);
        assert_eq!(result.ids().len(), 2_500);
        assert_eq!(result.ids()[2_499], Value::Integer(2_500));
        assert!(db.executor().statements[0]
            .0
            .starts_with("INSERT INTO [users] ([age]) OUTPUT inserted.[id] VALUES (?), (?)"));
    }

    #[test]
    fn test_bulk_insert_stops_at_failing_batch() {
        let mut db = database(Dialect::MySql);
        db.reconfigure([("max_params", json!(2))]).unwrap();
        db.executor_mut().fail_on = Some(1);

        let err = db.insert_rows(&bulk(6)).unwrap_err();
        assert!(matches!(err, DbError::QueryExecutionFailed { ref params, .. } if params.len() == 2));
        assert_eq!(db.executor().statements.len(), 1);
    }

    #[test]
    fn test_events_reported() {
        let sink = Arc::new(CollectorSink::default());
        let mut db = database(Dialect::MySql).with_events(sink.clone());

        db.insert_rows(&bulk(3)).unwrap();
        db.delete(&DeleteQuery::new().filter(Filter::new().eq("age", Value::Null)))
            .unwrap();

        let events = sink.events();
        assert!(matches!(
            events[0],
            QueryEvent::BatchPlanned {
                rows: 3,
                statements: 1,
                ..
            }
        ));
        assert!(matches!(
            events[1],
            QueryEvent::StatementExecuted {
                kind: StatementKind::Insert,
                affected: 3,
                ..
            }
        ));
        assert!(matches!(events[2], QueryEvent::NullComparison { .. }));
        assert!(matches!(
            events[3],
            QueryEvent::StatementExecuted {
                kind: StatementKind::Delete,
                ..
            }
        ));
    }

    #[test]
    fn test_transaction_commit_and_rollback() {
        let mut db = database(Dialect::Postgres);

        db.transaction(|db| db.update(&UpdateQuery::new().set("age", 1).filter(Filter::new().eq("id", 1))))
            .unwrap();
        assert_eq!(db.executor().calls, vec!["begin", "execute", "commit"]);

        let err = db
            .transaction(|db| {
                db.delete(&DeleteQuery::new().filter(Filter::new().eq("id", 1)))?;
                db.update(&UpdateQuery::new())
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Query(QueryError::EmptyUpdateClause)));
        assert_eq!(
            &db.executor().calls[3..],
            &["begin", "execute", "rollback"]
        );
    }

    #[test]
    fn test_validation_errors_execute_nothing() {
        let mut db = database(Dialect::Sqlite);
        let err = db
            .select(&SelectQuery::new().columns(["password"]))
            .unwrap_err();
        assert!(matches!(err, DbError::Query(QueryError::UnknownColumn { .. })));
        assert!(db.executor().statements.is_empty());
    }

    #[test]
    fn test_reconfigure_keeps_options_on_error() {
        let mut db = database(Dialect::Sqlite);
        let err = db.reconfigure([("timeout", json!(5))]).unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
        assert_eq!(db.options().dialect(), Dialect::Sqlite);
    }

    #[test]
    fn test_mysql_70k_rows_split_at_65536_params() {
        let mut db = database(Dialect::MySql);
        db.reconfigure([("max_params", json!(65_536))]).unwrap();

        let result = db.insert_rows(&bulk(70_000)).unwrap();
        assert_eq!(result.statement_count(), 2);
        assert_eq!(result.affected_count(), 70_000);
        assert_eq!(result.ids().len(), 70_000);
        assert_eq!(result.ids()[65_536], Value::Integer(65_537));

        let sizes: Vec<_> = db
            .executor()
            .statements
            .iter()
            .map(|(_, params)| params.len())
            .collect();
        assert_eq!(sizes, vec![65_536, 4_464]);
        assert_eq!(db.executor().statements[1].1[0], Value::Integer(65_536));
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let sink = Arc::new(CollectorSink::default());
        let mut db = database(Dialect::Postgres).with_events(sink.clone());
        db.executor_mut().fail_commit = true;

        let err = db
            .transaction(|db| db.delete(&DeleteQuery::new().filter(Filter::new().eq("id", 1))))
            .unwrap_err();
        assert!(matches!(err, DbError::TransactionFailed { stage: "commit", .. }));
        assert_eq!(
            db.executor().calls,
            vec!["begin", "execute", "commit", "rollback"]
        );
        assert!(matches!(
            sink.events().last(),
            Some(QueryEvent::Transaction {
                stage: TransactionStage::Rollback
            })
        ));
    }

    #[test]
    fn test_count_without_integer_cell_fails() {
        let mut db = database(Dialect::Sqlite);
        let err = db.count(&SelectQuery::new()).unwrap_err();
        assert!(matches!(err, DbError::UnexpectedResult { .. }));
    }
}
