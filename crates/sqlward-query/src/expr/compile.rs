//! Operator compiler: one column's [`Condition`] to predicates.

use sqlward_events::{EventSink, QueryEvent};
use tracing::warn;

use crate::{
    error::{QueryError, Result},
    value::Value,
};

use super::{
    column::Ident,
    filter::{Condition, Operand},
    operator::{Arity, Operator},
    ops::{BinaryOp, InOp, NullOp, Predicate},
};

/// Compiles the condition on `column` (already whitelisted and escaped as
/// `ident`) into predicates, in operator then value order.
pub fn compile(
    column: &str,
    ident: &Ident,
    condition: &Condition,
    events: &dyn EventSink,
) -> Result<Vec<Predicate>> {
    match condition {
        Condition::Value(value) => {
            compile_op(column, ident, Operator::Eq, &Operand::Value(value.clone()), events)
        }
        Condition::List(values) => {
            compile_op(column, ident, Operator::Eq, &Operand::List(values.clone()), events)
        }
        Condition::Ops(ops) => {
            if ops.is_empty() {
                return Err(QueryError::EmptyFilterList {
                    column: column.to_string(),
                });
            }
            let mut predicates = Vec::with_capacity(ops.len());
            for (op, operand) in ops {
                predicates.extend(compile_op(column, ident, *op, operand, events)?);
            }
            Ok(predicates)
        }
    }
}

fn compile_op(
    column: &str,
    ident: &Ident,
    op: Operator,
    operand: &Operand,
    events: &dyn EventSink,
) -> Result<Vec<Predicate>> {
    match operand {
        Operand::Value(Value::Null) => {
            let Some(counterpart) = op.null_counterpart() else {
                return Err(QueryError::InvalidOperatorForNull {
                    column: column.to_string(),
                    operator: op.code().to_string(),
                });
            };
            warn!(
                column,
                "comparing against null with `{}` is deprecated, use `{}` instead", op, counterpart
            );
            events.emit(QueryEvent::NullComparison {
                column: column.to_string(),
                operator: op.code().to_string(),
                suggested: counterpart.code().to_string(),
            });
            Ok(vec![null_check(ident, counterpart)])
        }
        Operand::Value(value) => match op.arity() {
            Arity::Blank if value.is_blank() => Ok(vec![null_check(ident, op)]),
            Arity::Blank => Err(mismatch(
                column,
                op,
                "takes no comparison value, pass an empty string",
            )),
            Arity::Scalar | Arity::ScalarOrList => Ok(vec![Predicate::Binary(BinaryOp::new(
                ident.clone(),
                op.symbol(),
                value.clone(),
            ))]),
        },
        Operand::List(values) => {
            match op.arity() {
                Arity::Blank => {
                    return Err(mismatch(
                        column,
                        op,
                        "takes no comparison value, pass an empty string",
                    ))
                }
                Arity::Scalar => {
                    return Err(mismatch(column, op, "cannot compare against a list of values"))
                }
                Arity::ScalarOrList => {}
            }
            if values.is_empty() {
                return Err(QueryError::EmptyFilterList {
                    column: column.to_string(),
                });
            }
            if values.iter().any(Value::is_null) {
                return Err(QueryError::InvalidOperatorForNull {
                    column: column.to_string(),
                    operator: op.code().to_string(),
                });
            }
            match op {
                Operator::Eq | Operator::Ne => Ok(vec![Predicate::In(InOp::new(
                    ident.clone(),
                    values.clone(),
                    op == Operator::Ne,
                ))]),
                _ => Ok(values
                    .iter()
                    .map(|value| {
                        Predicate::Binary(BinaryOp::new(ident.clone(), op.symbol(), value.clone()))
                    })
                    .collect()),
            }
        }
    }
}

fn null_check(ident: &Ident, op: Operator) -> Predicate {
    Predicate::Null(NullOp::new(ident.clone(), op == Operator::Nu))
}

fn mismatch(column: &str, op: Operator, reason: &str) -> QueryError {
    QueryError::OperatorValueMismatch {
        column: column.to_string(),
        operator: op.code().to_string(),
        reason: reason.to_string(),
    }
}
