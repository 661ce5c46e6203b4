//! Shorthand filter operators.

use std::{fmt, str::FromStr};

use crate::error::QueryError;

/// A shorthand comparison operator used in filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Lk,
    Nl,
    Nu,
    Nn,
}

/// Operand shapes an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Only the blank placeholder.
    Blank,
    /// A single value.
    Scalar,
    /// A single value or a non-empty list.
    ScalarOrList,
}

/// Operator code, SQL symbol and arity, in declaration order.
const OPERATORS: [(Operator, &str, &str, Arity); 10] = [
    (Operator::Eq, "eq", "=", Arity::ScalarOrList),
    (Operator::Ne, "ne", "<>", Arity::ScalarOrList),
    (Operator::Lt, "lt", "<", Arity::Scalar),
    (Operator::Le, "le", "<=", Arity::Scalar),
    (Operator::Gt, "gt", ">", Arity::Scalar),
    (Operator::Ge, "ge", ">=", Arity::Scalar),
    (Operator::Lk, "lk", "LIKE", Arity::ScalarOrList),
    (Operator::Nl, "nl", "NOT LIKE", Arity::ScalarOrList),
    (Operator::Nu, "nu", "IS NULL", Arity::Blank),
    (Operator::Nn, "nn", "IS NOT NULL", Arity::Blank),
];

impl Operator {
    pub const ALL: [Operator; 10] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::Lk,
        Operator::Nl,
        Operator::Nu,
        Operator::Nn,
    ];

    const fn entry(self) -> (Operator, &'static str, &'static str, Arity) {
        OPERATORS[self as usize]
    }

    /// The shorthand code, e.g. `"ge"`.
    pub const fn code(self) -> &'static str {
        self.entry().1
    }

    /// The SQL spelling, e.g. `">="`.
    pub const fn symbol(self) -> &'static str {
        self.entry().2
    }

    pub const fn arity(self) -> Arity {
        self.entry().3
    }

    /// The dedicated null check replacing `eq`/`ne` against null.
    pub const fn null_counterpart(self) -> Option<Operator> {
        match self {
            Operator::Eq => Some(Operator::Nu),
            Operator::Ne => Some(Operator::Nn),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OPERATORS
            .iter()
            .find(|(_, code, _, _)| *code == s)
            .map(|(op, _, _, _)| *op)
            .ok_or_else(|| QueryError::InvalidOperator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_table_matches_variants() {
        for op in Operator::ALL {
            assert_eq!(op.entry().0, op);
            assert_eq!(op.code().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(Operator::Ne.symbol(), "<>");
        assert_eq!(Operator::Le.symbol(), "<=");
        assert_eq!(Operator::Nl.symbol(), "NOT LIKE");
        assert_eq!(Operator::Nn.symbol(), "IS NOT NULL");
    }

    #[test]
    fn test_operator_arity() {
        assert_eq!(Operator::Eq.arity(), Arity::ScalarOrList);
        assert_eq!(Operator::Lk.arity(), Arity::ScalarOrList);
        assert_eq!(Operator::Gt.arity(), Arity::Scalar);
        assert_eq!(Operator::Nu.arity(), Arity::Blank);
    }

    #[test]
    fn test_invalid_operator() {
        assert_eq!(
            "gte".parse::<Operator>(),
            Err(QueryError::InvalidOperator("gte".to_string()))
        );
        assert!("EQ".parse::<Operator>().is_err());
    }

    #[test]
    fn test_null_counterpart() {
        assert_eq!(Operator::Eq.null_counterpart(), Some(Operator::Nu));
        assert_eq!(Operator::Ne.null_counterpart(), Some(Operator::Nn));
        assert_eq!(Operator::Lt.null_counterpart(), None);
    }
}
