//! Structured filter expressions.
//!
//! A [`Filter`] maps column names to a [`Condition`]: a bare value (equality),
//! a list (membership) or a set of shorthand operators. Entry order is kept,
//! and bound parameters follow it.

use serde_json::{Map, Value as JsonValue};

use crate::{
    error::{QueryError, Result},
    value::Value,
};

use super::operator::Operator;

/// Right-hand side of one operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    List(Vec<Value>),
}

impl Operand {
    pub fn value(value: impl Into<Value>) -> Self {
        Operand::Value(value.into())
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Operand::List(values.into_iter().map(Into::into).collect())
    }

    /// The placeholder operand required by `nu` and `nn`.
    pub fn blank() -> Self {
        Operand::Value(Value::blank())
    }
}

/// What a single column is filtered by.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Implicit `eq`.
    Value(Value),
    /// Implicit `eq` against every element, i.e. `IN(...)`.
    List(Vec<Value>),
    /// Explicit operators, combined with `AND`.
    Ops(Vec<(Operator, Operand)>),
}

/// Column → condition mapping, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    entries: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column` to `condition`, replacing any existing condition in place.
    pub fn condition(mut self, column: impl Into<String>, condition: Condition) -> Self {
        let column = column.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = condition,
            None => self.entries.push((column, condition)),
        }
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(column, Condition::Value(value.into()))
    }

    pub fn any<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.condition(
            column,
            Condition::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Adds `op` for `column`. Repeated calls on one column accumulate, so a
    /// range can be written as `.op("age", Ge, 18).op("age", Lt, 65)`.
    pub fn op(self, column: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        self.push_op(column.into(), op, Operand::value(value))
    }

    pub fn op_list<I, V>(self, column: impl Into<String>, op: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_op(column.into(), op, Operand::list(values))
    }

    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.push_op(column.into(), Operator::Nu, Operand::blank())
    }

    pub fn not_null(self, column: impl Into<String>) -> Self {
        self.push_op(column.into(), Operator::Nn, Operand::blank())
    }

    /// Adds `op` to `column`. An earlier bare value or list on the same column
    /// is kept as an `eq` entry.
    fn push_op(mut self, column: String, op: Operator, operand: Operand) -> Self {
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => {
                let mut ops = match std::mem::replace(existing, Condition::Ops(vec![])) {
                    Condition::Ops(ops) => ops,
                    Condition::Value(value) => vec![(Operator::Eq, Operand::Value(value))],
                    Condition::List(values) => vec![(Operator::Eq, Operand::List(values))],
                };
                ops.push((op, operand));
                *existing = Condition::Ops(ops);
            }
            None => self
                .entries
                .push((column, Condition::Ops(vec![(op, operand)]))),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.entries.iter().map(|(c, cond)| (c.as_str(), cond))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Parses a JSON object such as
    /// `{"id": [3, 4], "age": {"ge": 18, "lt": 65}, "deleted_at": {"nu": ""}}`.
    pub fn from_json(object: &Map<String, JsonValue>) -> Result<Self> {
        let mut filter = Filter::new();
        for (column, value) in object {
            let condition = condition_from_json(column, value)?;
            filter = filter.condition(column.as_str(), condition);
        }
        Ok(filter)
    }
}

fn condition_from_json(column: &str, value: &JsonValue) -> Result<Condition> {
    match value {
        JsonValue::Array(items) => Ok(Condition::List(list_from_json(column, "eq", items)?)),
        JsonValue::Object(ops) => {
            let mut parsed = Vec::with_capacity(ops.len());
            for (code, operand) in ops {
                let op: Operator = code.parse()?;
                let operand = match operand {
                    JsonValue::Array(items) => {
                        Operand::List(list_from_json(column, op.code(), items)?)
                    }
                    scalar => Operand::Value(scalar_from_json(column, op.code(), scalar)?),
                };
                parsed.push((op, operand));
            }
            Ok(Condition::Ops(parsed))
        }
        scalar => Ok(Condition::Value(scalar_from_json(column, "eq", scalar)?)),
    }
}

fn list_from_json(column: &str, operator: &str, items: &[JsonValue]) -> Result<Vec<Value>> {
    items
        .iter()
        .map(|item| scalar_from_json(column, operator, item))
        .collect()
}

fn scalar_from_json(column: &str, operator: &str, value: &JsonValue) -> Result<Value> {
    Value::from_json(value).ok_or_else(|| QueryError::OperatorValueMismatch {
        column: column.to_string(),
        operator: operator.to_string(),
        reason: "expects scalar values, not nested arrays or objects".to_string(),
    })
}

impl TryFrom<&JsonValue> for Filter {
    type Error = QueryError;

    fn try_from(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(object) => Filter::from_json(object),
            JsonValue::Null => Ok(Filter::new()),
            other => Err(QueryError::OperatorValueMismatch {
                column: String::new(),
                operator: "where".to_string(),
                reason: format!("expects an object of column conditions, got {other}"),
            }),
        }
    }
}
