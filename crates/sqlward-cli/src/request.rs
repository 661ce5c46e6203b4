//! JSON request shapes accepted by `build` and `exec`.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use sqlward_config::DialectOptions;
use sqlward_query::{
    BulkInsert, DeleteQuery, Filter, InsertQuery, Page, SelectQuery, Sort, UpdateQuery, Value,
};

use crate::error::{CliError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectRequest {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default, rename = "where")]
    filter: Map<String, JsonValue>,
    #[serde(default)]
    order_by: Vec<(String, String)>,
    page: Option<u64>,
    page_size: Option<u64>,
}

impl SelectRequest {
    /// A missing `page` means page 1; a missing `page_size` means the
    /// table's maximum page size.
    pub fn into_query(self, options: &DialectOptions) -> Result<SelectQuery> {
        let mut query = SelectQuery::new()
            .columns(self.columns)
            .filter(Filter::from_json(&self.filter)?);
        for (column, direction) in self.order_by {
            query = query.order_by(Sort::new(column, direction.parse()?));
        }
        if self.page.is_some() || self.page_size.is_some() {
            query = query.page(Page::new(
                self.page.unwrap_or(1),
                self.page_size.unwrap_or(options.max_page_size()),
            ));
        }
        Ok(query)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InsertRequest {
    columns: Vec<String>,
    rows: Vec<Vec<JsonValue>>,
}

/// An insert request is either one row or many.
pub enum Insert {
    Single(InsertQuery),
    Bulk(BulkInsert),
}

impl InsertRequest {
    pub fn into_insert(self) -> Result<Insert> {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                row.iter()
                    .map(|cell| {
                        Value::from_json(cell).ok_or_else(|| {
                            CliError::InvalidRequest(format!(
                                "row {idx} contains a nested array or object"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        if let [row] = rows.as_slice() {
            if row.len() == self.columns.len() {
                let query = self
                    .columns
                    .iter()
                    .zip(row)
                    .fold(InsertQuery::new(), |query, (column, value)| {
                        query.set(column.as_str(), value.clone())
                    });
                return Ok(Insert::Single(query));
            }
        }
        Ok(Insert::Bulk(BulkInsert::new(self.columns).rows(rows)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRequest {
    set: Map<String, JsonValue>,
    #[serde(default, rename = "where")]
    filter: Map<String, JsonValue>,
}

impl UpdateRequest {
    pub fn into_query(self) -> Result<UpdateQuery> {
        let mut query = UpdateQuery::new().filter(Filter::from_json(&self.filter)?);
        for (column, value) in &self.set {
            let value = Value::from_json(value).ok_or_else(|| {
                CliError::InvalidRequest(format!("set value for `{column}` must be a scalar"))
            })?;
            query = query.set(column.as_str(), value);
        }
        Ok(query)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteRequest {
    #[serde(default, rename = "where")]
    filter: Map<String, JsonValue>,
}

impl DeleteRequest {
    pub fn into_query(self) -> Result<DeleteQuery> {
        Ok(DeleteQuery::new().filter(Filter::from_json(&self.filter)?))
    }
}

#[cfg(test)]
mod tests {
    use sqlward_config::Dialect;
    use sqlward_query::QueryError;

    use super::*;

    fn options() -> DialectOptions {
        DialectOptions::new(Dialect::Sqlite, "users", ["id", "name", "age"]).unwrap()
    }

    #[test]
    fn test_select_request() {
        let request: SelectRequest = serde_json::from_str(
            r#"{"columns": ["id"], "where": {"age": {"ge": 18}}, "order_by": [["name", "desc"]], "page": 2, "page_size": 10}"#,
        )
        .unwrap();
        let fragment = request.into_query(&options()).unwrap().build(&options()).unwrap();
        assert_eq!(
            fragment.sql(),
            "SELECT \"id\" FROM \"users\" WHERE \"age\" >= ? ORDER BY \"name\" DESC LIMIT 10 OFFSET 10"
        );
    }

    #[test]
    fn test_select_request_defaults() {
        let request: SelectRequest = serde_json::from_str(r#"{"page": 3}"#).unwrap();
        let fragment = request.into_query(&options()).unwrap().build(&options()).unwrap();
        assert_eq!(fragment.sql(), "SELECT * FROM \"users\" LIMIT 1000 OFFSET 2000");
    }

    #[test]
    fn test_select_request_rejects_bad_direction_and_fields() {
        let request: SelectRequest =
            serde_json::from_str(r#"{"order_by": [["name", "up"]]}"#).unwrap();
        assert!(matches!(
            request.into_query(&options()),
            Err(CliError::Query(QueryError::InvalidSortDirection(_)))
        ));
        assert!(serde_json::from_str::<SelectRequest>(r#"{"limit": 5}"#).is_err());
    }

    #[test]
    fn test_insert_request_single_and_bulk() {
        let request: InsertRequest =
            serde_json::from_str(r#"{"columns": ["name", "age"], "rows": [["a", 1]]}"#).unwrap();
        assert!(matches!(request.into_insert().unwrap(), Insert::Single(_)));

        let request: InsertRequest =
            serde_json::from_str(r#"{"columns": ["name"], "rows": [["a"], ["b"]]}"#).unwrap();
        match request.into_insert().unwrap() {
            Insert::Bulk(bulk) => assert_eq!(bulk.row_count(), 2),
            Insert::Single(_) => panic!("expected a bulk insert"),
        }

        let request: InsertRequest =
            serde_json::from_str(r#"{"columns": ["name"], "rows": [[["nested"]]]}"#).unwrap();
        assert!(matches!(
            request.into_insert(),
            Err(CliError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_update_and_delete_requests() {
        let request: UpdateRequest =
            serde_json::from_str(r#"{"set": {"name": "x"}, "where": {"id": 1}}"#).unwrap();
        let fragment = request.into_query().unwrap().build(&options()).unwrap();
        assert_eq!(fragment.sql(), "UPDATE \"users\" SET \"name\" = ? WHERE \"id\" = ?");

        let request: DeleteRequest = serde_json::from_str(r#"{"where": {"id": [1, 2]}}"#).unwrap();
        let fragment = request.into_query().unwrap().build(&options()).unwrap();
        assert_eq!(fragment.sql(), "DELETE FROM \"users\" WHERE \"id\" IN(?, ?)");
    }
}
