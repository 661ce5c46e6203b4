//! An already-escaped identifier usable as an expression.

use crate::{traits::Expression, value::Value};

/// An identifier that has been whitelisted and quoted.
///
/// Only the crate hands these out after escaping, so the text is emitted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(String);

impl Ident {
    pub fn new(escaped: impl Into<String>) -> Self {
        Self(escaped.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Expression for Ident {
    fn to_sql(&self, _params: &mut Vec<Value>) -> String {
        self.0.clone()
    }
}
