use nu_ansi_term::Color::{Cyan, Green};
use sqlward_config::DialectOptions;
use sqlward_events::ChannelSink;
use sqlward_query::SqlFragment;
use tracing::info;

use crate::{
    cli::Kind,
    error::Result,
    events::report_events,
    request::{DeleteRequest, Insert, InsertRequest, SelectRequest, UpdateRequest},
    utils::Colored,
};

/// Prints the statement(s) for `request` without touching a database.
pub fn build_request(kind: Kind, options: &DialectOptions, request: &str) -> Result<()> {
    let (sink, rx) = ChannelSink::new();

    match kind {
        Kind::Select => {
            let query = serde_json::from_str::<SelectRequest>(request)?.into_query(options)?;
            print_fragment(&query.build_with(options, &sink)?)?;
        }
        Kind::Insert => {
            match serde_json::from_str::<InsertRequest>(request)?.into_insert()? {
                Insert::Single(query) => print_fragment(&query.build(options)?)?,
                Insert::Bulk(insert) => {
                    let plan = insert.plan_with(options, &sink)?;
                    let total = plan.statement_count();
                    for (idx, batch) in plan.iter().enumerate() {
                        info!(
                            "{}",
                            Colored(
                                Green,
                                format!(
                                    "-- statement {}/{} (rows {}..{})",
                                    idx + 1,
                                    total,
                                    batch.rows.start,
                                    batch.rows.end
                                )
                            )
                        );
                        print_fragment(&batch.fragment)?;
                    }
                }
            }
        }
        Kind::Update => {
            let query = serde_json::from_str::<UpdateRequest>(request)?.into_query()?;
            print_fragment(&query.build_with(options, &sink)?)?;
        }
        Kind::Delete => {
            let query = serde_json::from_str::<DeleteRequest>(request)?.into_query()?;
            print_fragment(&query.build_with(options, &sink)?)?;
        }
    }

    drop(sink);
    report_events(&rx);
    Ok(())
}

fn print_fragment(fragment: &SqlFragment) -> Result<()> {
    info!("{}", Colored(Cyan, fragment.sql()));
    info!("params: {}", serde_json::to_string(fragment.params())?);
    Ok(())
}
