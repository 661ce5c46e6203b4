//! Configuration for sqlward.
//!
//! - [`dialect`]: supported SQL dialects and their fixed limits
//! - [`options`]: the immutable per-table whitelist handed to every builder
//! - [`config`]: the TOML config file listing whitelisted tables

pub mod annotations;
pub mod config;
pub mod dialect;
pub mod error;
pub mod options;

pub use dialect::{Dialect, IdStrategy, PaginationStyle};
pub use error::{ConfigError, Result};
pub use options::DialectOptions;

#[cfg(test)]
pub mod test_utils;
