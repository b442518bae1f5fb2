//! Microsoft SQL Server driver.
//!
//! - [`MssqlDialect`]: capability table and type rules for SQL Server 2016+

mod dialect;

pub use dialect::MssqlDialect;
