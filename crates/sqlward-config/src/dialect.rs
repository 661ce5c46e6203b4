//! SQL dialects and their fixed properties.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A SQL backend's syntax and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Sqlite,
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "sqlserver")]
    SqlServer,
}

/// How a dialect reports identifiers generated by an INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// `INSERT ... RETURNING <id>`: one row per inserted row.
    Returning,
    /// `INSERT ... OUTPUT inserted.<id> VALUES ...`: one row per inserted row.
    Output,
    /// The driver reports the id of the first inserted row; ids are consecutive.
    FirstInsertId,
}

/// How a dialect spells LIMIT/OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetch,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Sqlite,
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::SqlServer,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::SqlServer => "sqlserver",
        }
    }

    /// Opening and closing identifier quote characters.
    pub const fn quotes(self) -> (char, char) {
        match self {
            Dialect::Sqlite | Dialect::Postgres => ('"', '"'),
            Dialect::MySql => ('`', '`'),
            Dialect::SqlServer => ('[', ']'),
        }
    }

    /// Bound parameter ceiling for a single statement.
    pub const fn default_max_params(self) -> usize {
        match self {
            Dialect::Sqlite => 32_766,
            Dialect::Postgres => 65_535,
            Dialect::MySql => 65_536,
            Dialect::SqlServer => 2_099,
        }
    }

    /// Row ceiling for a single multi-row INSERT, if the dialect has one.
    pub const fn default_max_insert_rows(self) -> Option<usize> {
        match self {
            Dialect::SqlServer => Some(1_000),
            _ => None,
        }
    }

    pub const fn id_strategy(self) -> IdStrategy {
        match self {
            Dialect::Sqlite | Dialect::Postgres => IdStrategy::Returning,
            Dialect::MySql => IdStrategy::FirstInsertId,
            Dialect::SqlServer => IdStrategy::Output,
        }
    }

    pub const fn pagination_style(self) -> PaginationStyle {
        match self {
            Dialect::SqlServer => PaginationStyle::OffsetFetch,
            _ => PaginationStyle::LimitOffset,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" | "pgsql" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            _ => Err(ConfigError::UnknownDialect(s.to_string())),
        }
    }
}
