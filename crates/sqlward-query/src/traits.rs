//! Core trait that powers the statement builders.

use crate::value::Value;

/// A type that can be rendered as a SQL fragment.
///
/// When `to_sql` is called, it appends bound parameters to the provided
/// `params` vector and returns the SQL text with `?` placeholders, in the
/// same order.
///
/// # Example
///
/// ```rust
/// use sqlward_query::expr::{ops::BinaryOp, Ident};
/// use sqlward_query::traits::Expression as _;
///
/// let expr = BinaryOp::new(Ident::new("\"name\""), "=", "alice".into());
/// let mut params = vec![];
/// let sql = expr.to_sql(&mut params);
/// assert_eq!(sql, "\"name\" = ?");
/// assert_eq!(params.len(), 1);
/// ```
pub trait Expression {
    fn to_sql(&self, params: &mut Vec<Value>) -> String;
}
