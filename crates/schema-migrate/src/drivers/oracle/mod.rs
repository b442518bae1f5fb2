//! Oracle driver.
//!
//! - [`OracleDialect`]: capability table and type rules for Oracle 12c+

mod dialect;

pub use dialect::OracleDialect;
