//! WHERE, ORDER BY and pagination clause builders.
//!
//! Statement builders compose these; each returns an [`SqlFragment`] that is
//! empty when the clause has nothing to say.

use std::{fmt, str::FromStr};

use sqlward_config::{DialectOptions, PaginationStyle};
use sqlward_events::EventSink;

use crate::{
    error::{QueryError, Result},
    escape::Whitelist,
    expr::{compile, Filter, Ident},
    fragment::SqlFragment,
    traits::Expression,
};

/// Builds `WHERE a AND b ...` for `filter`.
///
/// Every column is checked against the whitelist before anything is
/// compiled. An empty filter yields an empty fragment.
pub fn build_where(
    options: &DialectOptions,
    filter: &Filter,
    events: &dyn EventSink,
) -> Result<SqlFragment> {
    if filter.is_empty() {
        return Ok(SqlFragment::empty());
    }

    let idents = filter
        .columns()
        .map(|column| options.column_sql(column).map(Ident::new))
        .collect::<Result<Vec<_>>>()?;

    let mut params = vec![];
    let mut conditions = vec![];
    for ((column, condition), ident) in filter.iter().zip(&idents) {
        for predicate in compile(column, ident, condition, events)? {
            conditions.push(predicate.to_sql(&mut params));
        }
    }

    Ok(SqlFragment::new(
        format!("WHERE {}", conditions.join(" AND ")),
        params,
    ))
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(QueryError::InvalidSortDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SortTarget {
    Column(String),
    Raw(String),
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    target: SortTarget,
    direction: Direction,
}

impl Sort {
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            target: SortTarget::Column(column.into()),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Desc)
    }

    /// A pre-escaped sort expression that skips the whitelist.
    ///
    /// Only for trusted input, e.g. `LOWER("name")` written by the caller.
    pub fn raw(expression: impl Into<String>, direction: Direction) -> Self {
        Self {
            target: SortTarget::Raw(expression.into()),
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Builds `ORDER BY a ASC, b DESC`. No terms yields an empty fragment.
pub fn build_order_by(options: &DialectOptions, sorts: &[Sort]) -> Result<SqlFragment> {
    if sorts.is_empty() {
        return Ok(SqlFragment::empty());
    }

    let terms = sorts
        .iter()
        .map(|sort| {
            let target = match &sort.target {
                SortTarget::Column(column) => options.column_sql(column)?,
                SortTarget::Raw(expression) => expression.clone(),
            };
            Ok(format!("{} {}", target, sort.direction))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SqlFragment::new(
        format!("ORDER BY {}", terms.join(", ")),
        vec![],
    ))
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number,
            size,
        }
    }

    /// Validates the page against `max_page_size` and returns `(limit, offset)`.
    pub fn limit_offset(&self, max_page_size: u64) -> Result<(u64, u64)> {
        if self.number < 1 {
            return Err(QueryError::InvalidPagination(format!(
                "page must be at least 1, got {}",
                self.number
            )));
        }
        if self.size < 1 || self.size > max_page_size {
            return Err(QueryError::InvalidPagination(format!(
                "page size must be between 1 and {}, got {}",
                max_page_size, self.size
            )));
        }
        let offset = (self.number - 1).checked_mul(self.size).ok_or_else(|| {
            QueryError::InvalidPagination(format!(
                "page {} of size {} is out of range",
                self.number, self.size
            ))
        })?;
        Ok((self.size, offset))
    }
}

/// Builds the pagination clause for `page`.
///
/// `ordered` says whether the statement already has an ORDER BY; the
/// `OFFSET ... FETCH` form is only valid after one.
pub fn build_pagination(options: &DialectOptions, page: &Page, ordered: bool) -> Result<SqlFragment> {
    let (limit, offset) = page.limit_offset(options.max_page_size())?;

    let sql = match options.dialect().pagination_style() {
        PaginationStyle::LimitOffset => format!("LIMIT {} OFFSET {}", limit, offset),
        PaginationStyle::OffsetFetch => {
            if !ordered {
                return Err(QueryError::InvalidPagination(format!(
                    "{} requires an ORDER BY clause to paginate",
                    options.dialect()
                )));
            }
            format!("OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", offset, limit)
        }
    };

    Ok(SqlFragment::new(sql, vec![]))
}
