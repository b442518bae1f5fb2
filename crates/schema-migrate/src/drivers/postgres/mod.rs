//! PostgreSQL driver.
//!
//! - [`PostgresDialect`]: capability table and type rules for PostgreSQL targets

mod dialect;

pub use dialect::PostgresDialect;
