use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Unknown option: {0}")]
    #[diagnostic(
        code(sqlward_config::unknown_option),
        help("Recognized options: dialect, table, columns, id_column, max_params, max_insert_rows, max_page_size")
    )]
    UnknownOption(String),

    #[error("Invalid value for option `{key}`: {reason}")]
    #[diagnostic(code(sqlward_config::invalid_option_value))]
    InvalidOptionValue { key: String, reason: String },

    #[error("Unknown dialect: {0}")]
    #[diagnostic(
        code(sqlward_config::unknown_dialect),
        help("Supported dialects: sqlite, postgres, mysql, sqlserver")
    )]
    UnknownDialect(String),

    #[error("Invalid table name: {0:?}")]
    #[diagnostic(
        code(sqlward_config::invalid_table),
        help("Table names must be non-blank")
    )]
    InvalidTable(String),

    #[error("Table not configured: {0}")]
    #[diagnostic(
        code(sqlward_config::missing_table),
        help("Add a [[tables]] entry for it to your config file")
    )]
    MissingTable(String),

    #[error("Duplicate table: {0}")]
    #[diagnostic(
        code(sqlward_config::duplicate_table),
        help("Each [[tables]] entry must have a unique name")
    )]
    DuplicateTable(String),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(sqlward_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(sqlward_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(sqlward_config::toml_deserialize),
        help("Check your config file syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(sqlward_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(sqlward_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(sqlward_config::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
