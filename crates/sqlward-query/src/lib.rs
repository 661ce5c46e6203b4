pub mod error;
pub mod escape;
pub mod expr;
pub mod fragment;
pub mod query;
pub mod result;
pub mod traits;
pub mod value;

pub use error::{QueryError, Result};
pub use escape::{escape_identifier, Whitelist};
pub use expr::{Condition, Filter, Operand, Operator};
pub use fragment::SqlFragment;
pub use query::*;
pub use result::{BulkInsertCollector, BulkInsertResult, InsertResult, RawResult, Row, RowSet};
pub use value::Value;

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlward_config::{Dialect, DialectOptions};
    use sqlward_events::{CollectorSink, NullSink, QueryEvent};

    use super::*;

    fn users(dialect: Dialect) -> DialectOptions {
        DialectOptions::new(dialect, "users", ["id", "name", "age", "deleted_at"])
            .unwrap()
            .with_id_column("id")
    }

    fn where_json(options: &DialectOptions, value: serde_json::Value) -> Result<SqlFragment> {
        let filter = Filter::try_from(&value)?;
        build_where(options, &filter, &NullSink)
    }

    #[test]
    fn test_where_from_json_scenarios() {
        let options = DialectOptions::new(Dialect::Sqlite, "users", ["id", "age"]).unwrap();

        let fragment = where_json(&options, json!({"id": [3, 4, 5]})).unwrap();
        assert_eq!(fragment.sql(), "WHERE \"id\" IN(?, ?, ?)");
        assert_eq!(fragment.params(), &[3, 4, 5].map(Value::Integer));

        let fragment = where_json(&options, json!({"age": {"ge": 18, "lt": 65}})).unwrap();
        assert_eq!(fragment.sql(), "WHERE \"age\" >= ? AND \"age\" < ?");
        assert_eq!(fragment.params(), &[18, 65].map(Value::Integer));
    }

    #[test]
    fn test_placeholders_match_params() {
        let options = users(Dialect::Postgres);
        let fragment = where_json(
            &options,
            json!({
                "name": {"lk": ["a%", "b%"], "nl": "%x"},
                "id": {"ne": [1, 2, 3], "gt": 0},
                "deleted_at": {"nn": ""},
                "age": null
            }),
        )
        .unwrap();

        assert_eq!(fragment.placeholder_count(), fragment.params().len());
        assert_eq!(
            fragment.params(),
            &[
                Value::from("a%"),
                Value::from("b%"),
                Value::from("%x"),
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3),
                Value::Integer(0),
            ]
        );
        assert_eq!(
            fragment.sql(),
            "WHERE \"name\" LIKE ? AND \"name\" LIKE ? AND \"name\" NOT LIKE ? \
             AND \"id\" NOT IN(?, ?, ?) AND \"id\" > ? \
             AND \"deleted_at\" IS NOT NULL AND \"age\" IS NULL"
        );
    }

    #[test]
    fn test_null_sugar_matches_null_operator() {
        let options = users(Dialect::Sqlite);
        let sugar = where_json(&options, json!({"deleted_at": null})).unwrap();
        let explicit = where_json(&options, json!({"deleted_at": {"nu": ""}})).unwrap();
        assert_eq!(sugar, explicit);
        assert_eq!(sugar.sql(), "WHERE \"deleted_at\" IS NULL");
        assert!(sugar.params().is_empty());

        let negated = where_json(&options, json!({"deleted_at": {"ne": null}})).unwrap();
        assert_eq!(negated.sql(), "WHERE \"deleted_at\" IS NOT NULL");
        assert!(negated.params().is_empty());
    }

    #[test]
    fn test_null_sugar_reports_event_through_select() {
        let sink = CollectorSink::default();
        SelectQuery::new()
            .filter(Filter::new().eq("deleted_at", Value::Null))
            .build_with(&users(Dialect::Sqlite), &sink)
            .unwrap();
        assert!(matches!(
            sink.null_comparisons().as_slice(),
            [QueryEvent::NullComparison { suggested, .. }] if suggested == "nu"
        ));
    }

    #[test]
    fn test_unknown_column_rejected_everywhere() {
        let options = users(Dialect::MySql);
        let bad = Filter::new().eq("password", "x");

        let results = [
            build_where(&options, &bad, &NullSink),
            build_order_by(&options, &[Sort::asc("password")]),
            SelectQuery::new().filter(bad.clone()).build(&options),
            SelectQuery::new().columns(["password"]).build(&options),
            UpdateQuery::new()
                .set("name", "x")
                .filter(bad.clone())
                .build(&options),
            UpdateQuery::new()
                .set("password", "x")
                .filter(Filter::new().eq("id", 1))
                .build(&options),
            DeleteQuery::new().filter(bad).build(&options),
            InsertQuery::new().set("password", "x").build(&options),
        ];
        for result in results {
            assert!(
                matches!(result, Err(QueryError::UnknownColumn { ref column, .. }) if column == "password"),
                "{result:?}"
            );
        }
        assert!(matches!(
            BulkInsert::new(["password"])
                .row(vec![Value::from("x")])
                .plan(&options),
            Err(QueryError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_builders_are_idempotent() {
        let options = users(Dialect::SqlServer);
        let update = UpdateQuery::new()
            .set("name", "alice")
            .filter(Filter::new().op("age", Operator::Ge, 18));
        assert_eq!(update.build(&options), update.build(&options));

        let bulk = BulkInsert::new(["name", "age"])
            .rows((0..10).map(|i| vec![Value::from(format!("user{i}")), Value::from(i)]));
        assert_eq!(bulk.plan(&options), bulk.plan(&options));
    }

    #[test]
    fn test_bulk_insert_70k_rows_end_to_end() {
        let options = DialectOptions::new(Dialect::MySql, "users", ["id", "name"])
            .unwrap()
            .reconfigure([("max_params", json!(65_536))])
            .unwrap();
        let plan = BulkInsert::new(["name"])
            .rows((0..70_000).map(|i| vec![Value::from(format!("user{i}"))]))
            .plan(&options)
            .unwrap();

        let sizes: Vec<_> = plan.iter().map(InsertBatch::row_count).collect();
        assert_eq!(sizes, vec![65_536, 4_464]);

        let mut collector = BulkInsertCollector::new(&options, plan.total_rows());
        let mut next_id = 1_i64;
        for batch in plan.iter() {
            let raw = RawResult {
                rows: vec![],
                affected: batch.row_count() as u64,
                insert_id: Some(next_id),
            };
            next_id += batch.row_count() as i64;
            collector.record(batch.row_count(), &raw).unwrap();
        }
        let result = collector.finish().unwrap();

        assert_eq!(result.statement_count(), 2);
        assert_eq!(result.affected_count(), 70_000);
        assert_eq!(result.ids().len(), 70_000);
        assert_eq!(result.ids()[0], Value::Integer(1));
        assert_eq!(result.ids()[69_999], Value::Integer(70_000));
    }

    #[test]
    fn test_pagination_scenarios() {
        let options = users(Dialect::Sqlite);
        let fragment = build_pagination(&options, &Page::new(3, 20), false).unwrap();
        assert_eq!(fragment.sql(), "LIMIT 20 OFFSET 40");
        assert!(matches!(
            build_pagination(&options, &Page::new(0, 20), false),
            Err(QueryError::InvalidPagination(_))
        ));
    }

    #[test]
    fn test_empty_update_fails_before_any_sql() {
        let result = UpdateQuery::new()
            .filter(Filter::new().eq("id", 3))
            .build(&users(Dialect::Postgres));
        assert_eq!(result, Err(QueryError::EmptyUpdateClause));
    }

    #[test]
    fn test_reconfigured_options_affect_later_builds() {
        let options = users(Dialect::Sqlite);
        let query = SelectQuery::new().columns(["name"]);
        let before = query.build(&options).unwrap();

        let options = options
            .reconfigure([("dialect", json!("mysql")), ("table", json!("people"))])
            .unwrap();
        let after = query.build(&options).unwrap();

        assert_eq!(before.sql(), "SELECT \"name\" FROM \"users\"");
        assert_eq!(after.sql(), "SELECT `name` FROM `people`");
    }
}
