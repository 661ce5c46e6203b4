//! SQL predicate operators.
//!
//! These structs represent single-column predicates like `col = ?` or
//! `col IN(?, ?)`. Each implements [`Expression`].

use crate::{traits::Expression, value::Value};

use super::column::Ident;

/// Represents a binary comparison (e.g., `=`, `>=`, `LIKE`).
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp<L> {
    left: L,
    op: &'static str,
    right: Value,
}

impl<L> BinaryOp<L> {
    pub fn new(left: L, op: &'static str, right: Value) -> Self {
        Self {
            left,
            op,
            right,
        }
    }
}

impl<L: Expression> Expression for BinaryOp<L> {
    fn to_sql(&self, params: &mut Vec<Value>) -> String {
        let left_sql = self.left.to_sql(params);
        params.push(self.right.clone());
        format!("{} {} ?", left_sql, self.op)
    }
}

/// Represents an `IN` or `NOT IN` list.
#[derive(Debug, Clone, PartialEq)]
pub struct InOp<L> {
    left: L,
    values: Vec<Value>,
    negated: bool,
}

impl<L> InOp<L> {
    pub fn new(left: L, values: Vec<Value>, negated: bool) -> Self {
        Self {
            left,
            values,
            negated,
        }
    }
}

impl<L: Expression> Expression for InOp<L> {
    fn to_sql(&self, params: &mut Vec<Value>) -> String {
        let left_sql = self.left.to_sql(params);
        let placeholders = vec!["?"; self.values.len()].join(", ");
        params.extend(self.values.iter().cloned());
        let op = if self.negated { "NOT IN" } else { "IN" };
        format!("{} {}({})", left_sql, op, placeholders)
    }
}

/// Represents an `IS NULL` or `IS NOT NULL` check.
#[derive(Debug, Clone, PartialEq)]
pub struct NullOp<L> {
    left: L,
    is_null: bool,
}

impl<L> NullOp<L> {
    pub fn new(left: L, is_null: bool) -> Self {
        Self {
            left,
            is_null,
        }
    }
}

impl<L: Expression> Expression for NullOp<L> {
    fn to_sql(&self, params: &mut Vec<Value>) -> String {
        let left_sql = self.left.to_sql(params);
        let op = if self.is_null {
            "IS NULL"
        } else {
            "IS NOT NULL"
        };
        format!("{} {}", left_sql, op)
    }
}

/// One compiled predicate over an escaped column.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Binary(BinaryOp<Ident>),
    In(InOp<Ident>),
    Null(NullOp<Ident>),
}

impl Expression for Predicate {
    fn to_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            Predicate::Binary(op) => op.to_sql(params),
            Predicate::In(op) => op.to_sql(params),
            Predicate::Null(op) => op.to_sql(params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Ident {
        Ident::new(format!("\"{name}\""))
    }

    #[test]
    fn test_binary_op() {
        let mut params = vec![];
        let sql = BinaryOp::new(col("age"), ">=", Value::Integer(18)).to_sql(&mut params);
        assert_eq!(sql, "\"age\" >= ?");
        assert_eq!(params, vec![Value::Integer(18)]);
    }

    #[test]
    fn test_in_op() {
        let mut params = vec![];
        let values = vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)];
        let sql = InOp::new(col("id"), values.clone(), false).to_sql(&mut params);
        assert_eq!(sql, "\"id\" IN(?, ?, ?)");
        assert_eq!(params, values);

        let mut params = vec![];
        let sql = InOp::new(col("id"), vec![Value::Integer(4)], true).to_sql(&mut params);
        assert_eq!(sql, "\"id\" NOT IN(?)");
    }

    #[test]
    fn test_null_op() {
        let mut params = vec![];
        assert_eq!(
            NullOp::new(col("deleted_at"), true).to_sql(&mut params),
            "\"deleted_at\" IS NULL"
        );
        assert_eq!(
            NullOp::new(col("deleted_at"), false).to_sql(&mut params),
            "\"deleted_at\" IS NOT NULL"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_predicate_appends_in_order() {
        let mut params = vec![Value::from("existing")];
        let predicate = Predicate::Binary(BinaryOp::new(col("name"), "LIKE", "a%".into()));
        predicate.to_sql(&mut params);
        assert_eq!(params, vec![Value::from("existing"), Value::from("a%")]);
    }
}
