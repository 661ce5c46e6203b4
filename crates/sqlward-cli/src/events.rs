use std::sync::mpsc::Receiver;

use sqlward_events::QueryEvent;
use tracing::debug;

/// Logs every event still queued on `rx`.
pub fn report_events(rx: &Receiver<QueryEvent>) {
    for event in rx.try_iter() {
        match event {
            QueryEvent::NullComparison {
                column,
                operator,
                suggested,
            } => debug!("null comparison on {column}: `{operator}` used where `{suggested}` fits"),
            QueryEvent::BatchPlanned {
                table,
                rows,
                statements,
            } => debug!("planned {rows} rows for {table} as {statements} statement(s)"),
            QueryEvent::StatementExecuted {
                kind,
                table,
                affected,
            } => debug!("{} on {table}: {affected} row(s)", kind.as_str()),
            QueryEvent::Transaction {
                stage,
            } => debug!("transaction {stage:?}"),
        }
    }
}
