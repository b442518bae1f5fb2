//! MySQL/MariaDB driver.
//!
//! - [`MysqlDialect`]: capability table and type rules for MySQL 8.0+ and
//!   MariaDB 10.2+ (registered under the `mariadb` alias)

mod dialect;

pub use dialect::MysqlDialect;
