use std::{path::Path, sync::Arc};

use sqlward_config::DialectOptions;
use sqlward_db::{Database, SqliteExecutor};
use sqlward_events::ChannelSink;
use tracing::{debug, info};

use crate::{
    cli::Kind,
    error::Result,
    events::report_events,
    request::{DeleteRequest, Insert, InsertRequest, SelectRequest, UpdateRequest},
};

/// Runs `request` against the SQLite database at `db_path`.
///
/// Bulk inserts run inside one transaction, so a failing batch leaves no
/// rows behind.
pub fn exec_request(kind: Kind, options: DialectOptions, db_path: &Path, request: &str) -> Result<()> {
    let executor = SqliteExecutor::open(db_path)?;
    let (sink, rx) = ChannelSink::new();
    let mut db = Database::new(executor, options).with_events(Arc::new(sink));

    match kind {
        Kind::Select => {
            let query = serde_json::from_str::<SelectRequest>(request)?.into_query(db.options())?;
            let rows = db.select(&query)?;
            for row in rows.rows() {
                info!("{}", serde_json::to_string(row)?);
            }
            debug!("{} row(s) selected", rows.len());
        }
        Kind::Insert => match serde_json::from_str::<InsertRequest>(request)?.into_insert()? {
            Insert::Single(query) => {
                let result = db.insert_row(&query)?;
                match result.id() {
                    Some(id) => info!("Inserted {} row(s), id {}", result.affected_count(), id),
                    None => info!("Inserted {} row(s)", result.affected_count()),
                }
            }
            Insert::Bulk(insert) => {
                let result = db.transaction(|db| db.insert_rows(&insert))?;
                info!(
                    "Inserted {} row(s) in {} statement(s)",
                    result.affected_count(),
                    result.statement_count()
                );
                if !result.ids().is_empty() {
                    info!("ids: {}", serde_json::to_string(result.ids())?);
                }
            }
        },
        Kind::Update => {
            let query = serde_json::from_str::<UpdateRequest>(request)?.into_query()?;
            info!("Updated {} row(s)", db.update(&query)?);
        }
        Kind::Delete => {
            let query = serde_json::from_str::<DeleteRequest>(request)?.into_query()?;
            info!("Deleted {} row(s)", db.delete(&query)?);
        }
    }

    drop(db);
    report_events(&rx);
    Ok(())
}
