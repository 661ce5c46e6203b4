use miette::Diagnostic;
use sqlward_config::ConfigError;
use sqlward_db::DbError;
use sqlward_query::QueryError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Db(#[from] DbError),

    #[error("Invalid request: {0}")]
    #[diagnostic(
        code(sqlward_cli::request),
        help("Requests are JSON objects, e.g. {{\"where\": {{\"id\": [1, 2]}}}}")
    )]
    InvalidRequest(String),

    #[error("Malformed JSON request: {0}")]
    #[diagnostic(code(sqlward_cli::json))]
    Json(#[from] serde_json::Error),

    #[error("IO error while {action}: {source}")]
    #[diagnostic(code(sqlward_cli::io))]
    Io {
        action: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;
