//! Expression types for building SQL conditions.
//!
//! This module contains the building blocks of WHERE clauses: the shorthand
//! [`Operator`] table, structured [`Filter`]s, and the predicates they
//! compile to.

pub mod column;
pub mod compile;
pub mod filter;
pub mod operator;
pub mod ops;

pub use column::Ident;
pub use compile::compile;
pub use filter::{Condition, Filter, Operand};
pub use operator::{Arity, Operator};
pub use ops::Predicate;
