//! Per-table dialect options.
//!
//! A [`DialectOptions`] value is the whitelist every builder validates
//! against. It never changes after construction: [`DialectOptions::reconfigure`]
//! returns a new value built from the old one plus overrides.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{
    dialect::Dialect,
    error::{ConfigError, Result},
};

/// Every option key accepted by [`DialectOptions::reconfigure`].
pub const OPTION_KEYS: [&str; 7] = [
    "dialect",
    "table",
    "columns",
    "id_column",
    "max_params",
    "max_insert_rows",
    "max_page_size",
];

pub const DEFAULT_MAX_PAGE_SIZE: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialectOptions {
    dialect: Dialect,
    table: String,
    columns: Vec<String>,
    id_column: Option<String>,
    max_params: usize,
    max_insert_rows: Option<usize>,
    max_page_size: u64,
}

impl DialectOptions {
    /// Creates options for `table` with the dialect's default limits.
    pub fn new<T, I, C>(dialect: Dialect, table: T, columns: I) -> Result<Self>
    where
        T: Into<String>,
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let options = Self {
            dialect,
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            id_column: None,
            max_params: dialect.default_max_params(),
            max_insert_rows: dialect.default_max_insert_rows(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        };
        options.validate()?;
        Ok(options)
    }

    /// Sets the column whose generated values are reported by inserts.
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn id_column(&self) -> Option<&str> {
        self.id_column.as_deref()
    }

    pub fn max_params(&self) -> usize {
        self.max_params
    }

    pub fn max_insert_rows(&self) -> Option<usize> {
        self.max_insert_rows
    }

    pub fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    /// Whether `column` is in the whitelist.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Builds a new option set from this one plus `overrides`.
    ///
    /// Every key is checked against [`OPTION_KEYS`] before anything is
    /// applied. Switching `dialect` resets `max_params` and
    /// `max_insert_rows` to the new dialect's defaults unless the same call
    /// overrides them.
    pub fn reconfigure<I, K>(&self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, JsonValue)>,
        K: Into<String>,
    {
        let overrides: Vec<(String, JsonValue)> = overrides
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();

        if let Some((key, _)) = overrides
            .iter()
            .find(|(key, _)| !OPTION_KEYS.contains(&key.as_str()))
        {
            return Err(ConfigError::UnknownOption(key.clone()));
        }

        let mut next = self.clone();

        if let Some((_, value)) = overrides.iter().find(|(key, _)| key == "dialect") {
            let name: String = parse_option("dialect", value.clone())?;
            let dialect: Dialect = name.parse()?;
            if dialect != next.dialect {
                next.dialect = dialect;
                next.max_params = dialect.default_max_params();
                next.max_insert_rows = dialect.default_max_insert_rows();
            }
        }

        for (key, value) in overrides {
            match key.as_str() {
                "dialect" => {}
                "table" => next.table = parse_option(&key, value)?,
                "columns" => next.columns = parse_option(&key, value)?,
                "id_column" => next.id_column = parse_option(&key, value)?,
                "max_params" => next.max_params = parse_option(&key, value)?,
                "max_insert_rows" => next.max_insert_rows = parse_option(&key, value)?,
                "max_page_size" => next.max_page_size = parse_option(&key, value)?,
                _ => unreachable!("option keys are checked above"),
            }
        }

        next.validate()?;
        debug!(
            "reconfigured options for table {} ({})",
            next.table, next.dialect
        );
        Ok(next)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(ConfigError::InvalidTable(self.table.clone()));
        }
        if let Some(blank) = self.columns.iter().find(|c| c.trim().is_empty()) {
            return Err(invalid("columns", format!("blank column name {blank:?}")));
        }
        if matches!(&self.id_column, Some(id) if id.trim().is_empty()) {
            return Err(invalid("id_column", "must not be blank"));
        }
        if self.max_params == 0 {
            return Err(invalid("max_params", "must be at least 1"));
        }
        if self.max_insert_rows == Some(0) {
            return Err(invalid("max_insert_rows", "must be at least 1"));
        }
        if self.max_page_size == 0 {
            return Err(invalid("max_page_size", "must be at least 1"));
        }
        Ok(())
    }
}

fn parse_option<T: DeserializeOwned>(key: &str, value: JsonValue) -> Result<T> {
    serde_json::from_value(value).map_err(|err| invalid(key, err.to_string()))
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidOptionValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}
