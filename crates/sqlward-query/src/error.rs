//! Error types for sqlward-query.

use miette::Diagnostic;
use thiserror::Error;

/// Failure while validating input or building a statement.
///
/// Every variant is raised before any SQL text is returned.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid identifier: {0:?}")]
    #[diagnostic(
        code(sqlward_query::invalid_identifier),
        help("Identifiers must be non-blank; qualified names need a non-empty segment on each side of every `.`")
    )]
    InvalidIdentifier(String),

    #[error("Unknown column `{column}` for table `{table}`")]
    #[diagnostic(
        code(sqlward_query::unknown_column),
        help("Add the column to the table's whitelist in your configuration")
    )]
    UnknownColumn { table: String, column: String },

    #[error("`{0}` is not a valid operator")]
    #[diagnostic(
        code(sqlward_query::invalid_operator),
        help("Valid operators: eq, ne, lt, le, gt, ge, lk, nl, nu, nn")
    )]
    InvalidOperator(String),

    #[error("Operator `{operator}` on column `{column}` {reason}")]
    #[diagnostic(code(sqlward_query::operator_value_mismatch))]
    OperatorValueMismatch {
        column: String,
        operator: String,
        reason: String,
    },

    #[error("Operator `{operator}` on column `{column}` cannot compare against null")]
    #[diagnostic(
        code(sqlward_query::invalid_operator_for_null),
        help("Use `nu` or `nn` to check for null")
    )]
    InvalidOperatorForNull { column: String, operator: String },

    #[error("Filter list for column `{column}` is empty")]
    #[diagnostic(
        code(sqlward_query::empty_filter_list),
        help("Provide at least one value, or drop the condition")
    )]
    EmptyFilterList { column: String },

    #[error("Update requires a non-empty set clause and a non-empty where clause")]
    #[diagnostic(code(sqlward_query::empty_update_clause))]
    EmptyUpdateClause,

    #[error("Insert requires at least one column and one row of values")]
    #[diagnostic(code(sqlward_query::missing_insert_data))]
    MissingInsertData,

    #[error("Insert row {row} has {found} values, expected {expected}")]
    #[diagnostic(
        code(sqlward_query::ragged_insert_rows),
        help("Every row must have one value per insert column")
    )]
    RaggedInsertRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column `{0}` is listed more than once")]
    #[diagnostic(code(sqlward_query::duplicate_column))]
    DuplicateColumn(String),

    #[error("Invalid pagination: {0}")]
    #[diagnostic(code(sqlward_query::invalid_pagination))]
    InvalidPagination(String),

    #[error("Invalid sort direction: {0:?}")]
    #[diagnostic(
        code(sqlward_query::invalid_sort_direction),
        help("Use `asc` or `desc`")
    )]
    InvalidSortDirection(String),

    #[error("A row of {width} values exceeds the limit of {max_params} bound parameters per statement")]
    #[diagnostic(
        code(sqlward_query::row_too_wide),
        help("Insert fewer columns per row, or raise max_params if the driver allows it")
    )]
    RowTooWide { width: usize, max_params: usize },

    #[error("Expected {expected} generated ids, the driver reported {found}")]
    #[diagnostic(code(sqlward_query::id_count_mismatch))]
    IdCountMismatch { expected: usize, found: usize },
}

/// Result type alias for sqlward-query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
